//! Canned quarterly records for IEF / TQQQ / GLD, 2022-01 through 2024-10.
//!
//! Only the CLI uses these, and only after a fetch failure when the user opted
//! in. Results built from them are labelled [`DataSource::Sample`].
//!
//! [`DataSource::Sample`]: crate::domain::backtest::DataSource::Sample

use crate::domain::period::{return_pct, Action, PeriodRecord};
use crate::domain::signal::{Holding, Instruments};
use chrono::{Months, NaiveDate};

/// (year, month, signal %, start price, end price)
const SAMPLE_PERIODS: [(i32, u32, f64, f64, f64); 12] = [
    (2022, 1, 0.8, 38.20, 32.10),
    (2022, 4, -1.5, 172.30, 177.80),
    (2022, 7, 1.1, 22.90, 26.40),
    (2022, 10, -0.7, 165.50, 172.20),
    (2023, 1, 1.2, 25.50, 32.10),
    (2023, 4, -0.8, 180.20, 175.80),
    (2023, 7, 0.6, 28.90, 31.40),
    (2023, 10, -0.3, 185.50, 191.20),
    (2024, 1, 1.5, 35.20, 42.80),
    (2024, 4, -1.1, 195.30, 188.90),
    (2024, 7, 0.9, 44.20, 47.50),
    (2024, 10, -0.4, 192.10, 196.30),
];

pub fn sample_instruments() -> Instruments {
    Instruments::default()
}

/// Sample records with `start <= rebalance_date <= end`. Actions are derived
/// within the filtered range, so the first returned record is `Initial`.
pub fn sample_records(start: NaiveDate, end: NaiveDate) -> Vec<PeriodRecord> {
    let instruments = sample_instruments();
    let mut current: Option<String> = None;
    let mut records = Vec::new();

    for &(year, month, signal_pct, start_price, end_price) in SAMPLE_PERIODS.iter() {
        let Some(rebalance_date) = NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };
        if rebalance_date < start || rebalance_date > end {
            continue;
        }

        let signal_date = rebalance_date
            .checked_sub_months(Months::new(1))
            .unwrap_or(rebalance_date);
        let hold_end = rebalance_date
            .checked_add_months(Months::new(2))
            .unwrap_or(rebalance_date);

        let holding = Holding::from_signal(signal_pct);
        let selected = instruments.symbol_for(holding).to_string();
        let action = Action::classify(current.as_deref(), &selected);

        records.push(PeriodRecord {
            rebalance_date,
            signal_date,
            hold_start: rebalance_date,
            hold_end,
            signal_pct,
            holding,
            selected: selected.clone(),
            action,
            start_price,
            end_price,
            return_pct: return_pct(start_price, end_price),
        });
        current = Some(selected);
    }

    records
}
