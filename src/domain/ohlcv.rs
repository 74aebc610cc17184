//! Monthly OHLC bar.

use chrono::NaiveDate;

/// One monthly observation for one instrument. `date` is the month anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcvBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Bar whose four prices all equal `open`; enough for open-to-open arithmetic.
    pub fn flat(date: NaiveDate, open: f64) -> Self {
        Self::new(date, open, open, open, open)
    }

    /// (close - open) / open * 100
    pub fn intra_bar_return_pct(&self) -> f64 {
        (self.close - self.open) / self.open * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcvBar {
        OhlcvBar::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            100.0,
            110.0,
            90.0,
            105.0,
        )
    }

    #[test]
    fn intra_bar_return() {
        let bar = sample_bar();
        assert!((bar.intra_bar_return_pct() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn flat_bar_uses_open_everywhere() {
        let bar = OhlcvBar::flat(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 42.5);
        assert_eq!(bar.high, 42.5);
        assert_eq!(bar.low, 42.5);
        assert_eq!(bar.close, 42.5);
        assert!((bar.intra_bar_return_pct()).abs() < f64::EPSILON);
    }
}
