//! Per-window rebalance records.

use crate::domain::signal::Holding;
use chrono::NaiveDate;
use std::fmt;

/// How a period's holding relates to the previous period's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Initial,
    Continued,
    Switched,
}

impl Action {
    pub fn classify(previous: Option<&str>, selected: &str) -> Self {
        match previous {
            None => Action::Initial,
            Some(prev) if prev == selected => Action::Continued,
            Some(_) => Action::Switched,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Initial => "initial",
            Action::Continued => "continued",
            Action::Switched => "switched",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (end - start) / start * 100
pub fn return_pct(start_price: f64, end_price: f64) -> f64 {
    (end_price - start_price) / start_price * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRecord {
    /// Start of the holding window.
    pub rebalance_date: NaiveDate,
    /// Lookback date the signal was measured from.
    pub signal_date: NaiveDate,
    pub hold_start: NaiveDate,
    pub hold_end: NaiveDate,
    pub signal_pct: f64,
    pub holding: Holding,
    pub selected: String,
    pub action: Action,
    pub start_price: f64,
    pub end_price: f64,
    pub return_pct: f64,
}

impl PeriodRecord {
    pub fn is_win(&self) -> bool {
        self.return_pct > 0.0
    }

    pub fn growth_factor(&self) -> f64 {
        1.0 + self.return_pct / 100.0
    }
}
