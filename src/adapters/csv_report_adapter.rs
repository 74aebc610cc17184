//! CSV report adapter implementing [`ReportPort`].
//!
//! Output is UTF-8 with a leading byte-order mark,
//! comma-delimited, one header row then one row per period.

use crate::adapters::table::{render_rows, HEADERS};
use crate::domain::backtest::BacktestResult;
use crate::domain::error::MomcheckError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn to_bytes(&self, result: &BacktestResult) -> Result<Vec<u8>, MomcheckError> {
        let mut buf = UTF8_BOM.to_vec();
        {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut buf);
            wtr.write_record(HEADERS)?;
            for row in render_rows(&result.periods) {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        Ok(buf)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), MomcheckError> {
        let bytes = self.to_bytes(result)?;
        fs::write(output_path, bytes)?;
        tracing::info!(path = %output_path.display(), rows = result.periods.len(), "wrote CSV report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{BacktestConfig, DataSource};
    use crate::domain::sample::{sample_instruments, sample_records};
    use chrono::NaiveDate;

    fn result(start: (i32, u32), end: (i32, u32)) -> BacktestResult {
        let config = BacktestConfig {
            instruments: sample_instruments(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, 28).unwrap(),
        };
        let periods = sample_records(config.start_date, config.end_date);
        BacktestResult::from_periods(&config, DataSource::Sample, periods.len() * 3 + 1, periods)
    }

    #[test]
    fn starts_with_bom_then_header() {
        let bytes = CsvReportAdapter::new().to_bytes(&result((2023, 1), (2023, 12))).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Period,Holding Window,Action,Signal (%),Holding,Start Price,End Price,Return (%)"
        );
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "2023/01,2023/01-2023/03,initial,+1.20,TQQQ,25.50,32.10,+25.88");
        assert_eq!(lines[2], "2023/04,2023/04-2023/06,switched,-0.80,GLD,180.20,175.80,-2.44");
    }

    #[test]
    fn empty_result_still_has_header() {
        let bytes = CsvReportAdapter::new().to_bytes(&result((2019, 1), (2019, 12))).unwrap();
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("backtest.csv");
        CsvReportAdapter::new()
            .write(&result((2022, 1), (2024, 12)), &path)
            .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 13);
    }
}
