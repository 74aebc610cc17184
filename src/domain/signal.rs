//! Momentum signal and holding decision.
//!
//! The signal is the reference instrument's one-period open-to-open return in
//! percent. A strictly positive signal selects the growth instrument; zero or
//! negative selects the defensive one.

use crate::domain::error::MomcheckError;
use crate::domain::series::BarSeries;
use chrono::NaiveDate;
use std::fmt;

/// The three symbols a run works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruments {
    pub reference: String,
    pub growth: String,
    pub defensive: String,
}

impl Instruments {
    pub fn new(
        reference: impl Into<String>,
        growth: impl Into<String>,
        defensive: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            growth: growth.into(),
            defensive: defensive.into(),
        }
    }

    pub fn symbol_for(&self, holding: Holding) -> &str {
        match holding {
            Holding::Growth => &self.growth,
            Holding::Defensive => &self.defensive,
        }
    }
}

impl Default for Instruments {
    fn default() -> Self {
        Self::new("IEF", "TQQQ", "GLD")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Holding {
    Growth,
    Defensive,
}

impl Holding {
    /// Ties at exactly zero go defensive.
    pub fn from_signal(signal_pct: f64) -> Self {
        if signal_pct > 0.0 {
            Holding::Growth
        } else {
            Holding::Defensive
        }
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holding::Growth => write!(f, "growth"),
            Holding::Defensive => write!(f, "defensive"),
        }
    }
}

/// (open(curr) - open(prev)) / open(prev) * 100
pub fn momentum_signal(
    reference: &BarSeries,
    prev: NaiveDate,
    curr: NaiveDate,
) -> Result<f64, MomcheckError> {
    let previous = reference.open_on(prev)?;
    let current = reference.open_on(curr)?;
    Ok((current - previous) / previous * 100.0)
}

/// Recommendation for the upcoming period from the latest two reference bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub signal_pct: f64,
    pub holding: Holding,
    pub symbol: String,
}

pub fn latest_recommendation(
    reference: &BarSeries,
    instruments: &Instruments,
) -> Result<Recommendation, MomcheckError> {
    let bars = reference.bars();
    let [.., prev, curr] = bars else {
        return Err(MomcheckError::InsufficientData {
            aligned: bars.len(),
            minimum: 2,
        });
    };

    let signal_pct = momentum_signal(reference, prev.date, curr.date)?;
    let holding = Holding::from_signal(signal_pct);
    Ok(Recommendation {
        from: prev.date,
        to: curr.date,
        signal_pct,
        holding,
        symbol: instruments.symbol_for(holding).to_string(),
    })
}
