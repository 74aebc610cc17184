//! Common date axis across the reference and candidate series.

use crate::domain::error::MomcheckError;
use crate::domain::series::BarSeries;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// One lookback date plus one full three-step rebalance window.
pub const MIN_ALIGNED_DATES: usize = 4;

/// Ascending dates present in every aligned series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedAxis {
    dates: Vec<NaiveDate>,
}

impl AlignedAxis {
    /// Intersection of the date sets of `series`, without a length check.
    pub fn intersect(series: &[&BarSeries]) -> Self {
        let Some((first, rest)) = series.split_first() else {
            return Self::default();
        };

        let common: BTreeSet<NaiveDate> = first
            .dates()
            .filter(|date| rest.iter().all(|s| s.contains(*date)))
            .collect();

        Self {
            dates: common.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

impl From<Vec<NaiveDate>> for AlignedAxis {
    fn from(dates: Vec<NaiveDate>) -> Self {
        let unique: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self {
            dates: unique.into_iter().collect(),
        }
    }
}

/// Align the reference and both candidates. Fewer than
/// [`MIN_ALIGNED_DATES`] common dates is `InsufficientData`.
pub fn align(
    reference: &BarSeries,
    growth: &BarSeries,
    defensive: &BarSeries,
) -> Result<AlignedAxis, MomcheckError> {
    let axis = AlignedAxis::intersect(&[reference, growth, defensive]);
    if axis.len() < MIN_ALIGNED_DATES {
        return Err(MomcheckError::InsufficientData {
            aligned: axis.len(),
            minimum: MIN_ALIGNED_DATES,
        });
    }
    tracing::debug!(
        dates = axis.len(),
        first = ?axis.first(),
        last = ?axis.last(),
        "aligned series"
    );
    Ok(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn series(symbol: &str, months: &[(i32, u32)]) -> BarSeries {
        let bars = months
            .iter()
            .map(|&(y, m)| OhlcvBar::flat(d(y, m), 100.0))
            .collect();
        BarSeries::new(symbol, bars).unwrap()
    }

    #[test]
    fn intersection_keeps_common_dates_sorted() {
        let ief = series("IEF", &[(2024, 1), (2024, 2), (2024, 3), (2024, 4), (2024, 5)]);
        let tqqq = series("TQQQ", &[(2024, 5), (2024, 2), (2024, 3), (2024, 4), (2024, 1)]);
        let gld = series("GLD", &[(2024, 1), (2024, 2), (2024, 4), (2024, 5), (2024, 6)]);

        let axis = align(&ief, &tqqq, &gld).unwrap();
        assert_eq!(axis.as_slice(), &[d(2024, 1), d(2024, 2), d(2024, 4), d(2024, 5)]);
    }

    #[test]
    fn too_few_common_dates_is_insufficient() {
        let ief = series("IEF", &[(2024, 1), (2024, 2), (2024, 3), (2024, 4)]);
        let tqqq = series("TQQQ", &[(2024, 1), (2024, 2), (2024, 3), (2024, 4)]);
        let gld = series("GLD", &[(2024, 2), (2024, 3), (2024, 4)]);

        let err = align(&ief, &tqqq, &gld).unwrap_err();
        assert!(matches!(
            err,
            MomcheckError::InsufficientData {
                aligned: 3,
                minimum: 4
            }
        ));
    }

    #[test]
    fn empty_input_is_insufficient() {
        let ief = series("IEF", &[(2024, 1), (2024, 2), (2024, 3), (2024, 4)]);
        let tqqq = series("TQQQ", &[]);
        let gld = series("GLD", &[(2024, 1), (2024, 2), (2024, 3), (2024, 4)]);

        let err = align(&ief, &tqqq, &gld).unwrap_err();
        assert!(matches!(err, MomcheckError::InsufficientData { aligned: 0, .. }));
    }

    #[test]
    fn intersect_of_nothing_is_empty() {
        assert!(AlignedAxis::intersect(&[]).is_empty());
    }

    #[test]
    fn from_vec_sorts_and_dedups() {
        let axis = AlignedAxis::from(vec![d(2024, 3), d(2024, 1), d(2024, 3)]);
        assert_eq!(axis.as_slice(), &[d(2024, 1), d(2024, 3)]);
        assert_eq!(axis.get(1), Some(d(2024, 3)));
        assert_eq!(axis.get(2), None);
    }
}
