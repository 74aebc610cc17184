//! Market data provider port.

use crate::domain::error::MomcheckError;
use crate::domain::series::BarSeries;
use chrono::NaiveDate;

/// Source of monthly bars. Implementations may be slow or flaky; transient
/// failures surface as `MomcheckError::Fetch`.
pub trait DataPort {
    fn fetch_monthly_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BarSeries, MomcheckError>;
}
