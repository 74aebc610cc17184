//! momcheck: reference-momentum rotation backtester.
//!
//! Each quarter the reference instrument's one-month momentum picks either the
//! growth or the defensive instrument for the next three months.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command-line surface in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
