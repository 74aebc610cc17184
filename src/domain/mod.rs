//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod alignment;
pub mod signal;
pub mod period;
pub mod backtest;
pub mod metrics;
pub mod sample;
pub mod config_validation;
pub mod error;
