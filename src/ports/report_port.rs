//! Report output port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MomcheckError;
use std::path::Path;

/// Port for exporting a backtest result.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), MomcheckError>;
}
