//! Per-symbol bar series with a date index.

use crate::domain::error::MomcheckError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Bars for one symbol, strictly increasing by date.
#[derive(Debug, Clone)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
    date_index: HashMap<NaiveDate, usize>,
}

impl BarSeries {
    /// Sorts `bars` by date. Two bars on the same date are rejected.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<OhlcvBar>) -> Result<Self, MomcheckError> {
        let symbol = symbol.into();
        bars.sort_by_key(|b| b.date);

        let mut date_index = HashMap::with_capacity(bars.len());
        for (i, bar) in bars.iter().enumerate() {
            if date_index.insert(bar.date, i).is_some() {
                return Err(MomcheckError::DuplicateBar {
                    symbol,
                    date: bar.date,
                });
            }
        }

        Ok(Self {
            symbol,
            bars,
            date_index,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_index.contains_key(&date)
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&OhlcvBar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Open price on `date`, or `MissingObservation` if the series has no bar there.
    pub fn open_on(&self, date: NaiveDate) -> Result<f64, MomcheckError> {
        self.get_bar(date)
            .map(|b| b.open)
            .ok_or_else(|| MomcheckError::MissingObservation {
                symbol: self.symbol.clone(),
                date,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn new_sorts_and_indexes() {
        let series = BarSeries::new(
            "IEF",
            vec![
                OhlcvBar::flat(d(2024, 3), 97.0),
                OhlcvBar::flat(d(2024, 1), 95.0),
                OhlcvBar::flat(d(2024, 2), 96.0),
            ],
        )
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(d(2024, 1)));
        assert_eq!(series.last_date(), Some(d(2024, 3)));
        let dates: Vec<_> = series.dates().collect();
        assert_eq!(dates, vec![d(2024, 1), d(2024, 2), d(2024, 3)]);
        assert!((series.open_on(d(2024, 2)).unwrap() - 96.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let result = BarSeries::new(
            "GLD",
            vec![
                OhlcvBar::flat(d(2024, 1), 180.0),
                OhlcvBar::flat(d(2024, 1), 181.0),
            ],
        );
        assert!(matches!(
            result,
            Err(MomcheckError::DuplicateBar { ref symbol, date }) if symbol == "GLD" && date == d(2024, 1)
        ));
    }

    #[test]
    fn open_on_missing_date() {
        let series = BarSeries::new("TQQQ", vec![OhlcvBar::flat(d(2024, 1), 50.0)]).unwrap();
        let err = series.open_on(d(2024, 2)).unwrap_err();
        assert!(matches!(err, MomcheckError::MissingObservation { .. }));
        assert!(series.get_bar(d(2024, 2)).is_none());
        assert!(series.contains(d(2024, 1)));
    }

    #[test]
    fn empty_series() {
        let series = BarSeries::new("IEF", Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
        assert_eq!(series.symbol(), "IEF");
    }
}
