//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row and columns
//! `date,open,high,low,close` (extra columns such as volume are ignored).

use crate::domain::error::MomcheckError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::BarSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    symbol: &str,
) -> Result<f64, MomcheckError> {
    record
        .get(index)
        .ok_or_else(|| MomcheckError::fetch(symbol, format!("missing {} column", column)))?
        .trim()
        .parse()
        .map_err(|e| MomcheckError::fetch(symbol, format!("invalid {} value: {}", column, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_monthly_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BarSeries, MomcheckError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            MomcheckError::fetch(symbol, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| MomcheckError::fetch(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| MomcheckError::fetch(symbol, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                MomcheckError::fetch(symbol, format!("invalid date format: {}", e))
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_price(&record, 1, "open", symbol)?,
                high: parse_price(&record, 2, "high", symbol)?,
                low: parse_price(&record, 3, "low", symbol)?,
                close: parse_price(&record, 4, "close", symbol)?,
            });
        }

        BarSeries::new(symbol, bars)
    }
}
