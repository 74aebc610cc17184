//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod retry_adapter;
pub mod cache_adapter;
pub mod file_config_adapter;
pub mod table;
pub mod csv_report_adapter;
