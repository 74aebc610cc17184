#![allow(dead_code)]

use chrono::{Months, NaiveDate};
use momcheck::domain::backtest::BacktestConfig;
use momcheck::domain::error::MomcheckError;
pub use momcheck::domain::ohlcv::OhlcvBar;
use momcheck::domain::series::BarSeries;
use momcheck::domain::signal::Instruments;
use momcheck::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory data port. Bars are filtered to the requested range; every call
/// is recorded.
pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn fetched_symbols(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(s, _, _)| s.clone()).collect()
    }
}

impl DataPort for MockDataPort {
    fn fetch_monthly_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BarSeries, MomcheckError> {
        self.calls
            .borrow_mut()
            .push((symbol.to_string(), start_date, end_date));

        if let Some(reason) = self.errors.get(symbol) {
            return Err(MomcheckError::fetch(symbol, reason.as_str()));
        }
        let bars = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        BarSeries::new(symbol, bars)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn month(y: i32, m: u32) -> NaiveDate {
    date(y, m, 1)
}

/// One flat bar per month starting at `first`, opens taken in order.
pub fn monthly_bars(first: NaiveDate, opens: &[f64]) -> Vec<OhlcvBar> {
    opens
        .iter()
        .enumerate()
        .map(|(i, &open)| {
            let d = first.checked_add_months(Months::new(i as u32)).unwrap();
            OhlcvBar::flat(d, open)
        })
        .collect()
}

pub fn monthly_series(symbol: &str, first: NaiveDate, opens: &[f64]) -> BarSeries {
    BarSeries::new(symbol, monthly_bars(first, opens)).unwrap()
}

pub fn instruments() -> Instruments {
    Instruments::new("IEF", "TQQQ", "GLD")
}

pub fn make_config(start: NaiveDate, end: NaiveDate) -> BacktestConfig {
    BacktestConfig {
        instruments: instruments(),
        start_date: start,
        end_date: end,
    }
}

/// Ten months from 2023-01. Window signals at indices 1, 4, 7 are
/// +1.0%, -0.98%, -0.99%: TQQQ, then GLD twice.
pub const REFERENCE_OPENS: [f64; 10] =
    [100.0, 101.0, 99.0, 102.0, 101.0, 102.0, 101.0, 100.0, 101.5, 103.0];
pub const GROWTH_OPENS: [f64; 10] = [20.0, 25.5, 28.0, 32.1, 30.0, 31.0, 33.0, 29.0, 35.0, 40.0];
pub const DEFENSIVE_OPENS: [f64; 10] =
    [170.0, 175.0, 178.0, 180.0, 182.0, 181.0, 177.0, 180.2, 178.0, 175.8];

/// Mock loaded with the three ten-month series above.
pub fn standard_port() -> MockDataPort {
    MockDataPort::new()
        .with_bars("IEF", monthly_bars(month(2023, 1), &REFERENCE_OPENS))
        .with_bars("TQQQ", monthly_bars(month(2023, 1), &GROWTH_OPENS))
        .with_bars("GLD", monthly_bars(month(2023, 1), &DEFENSIVE_OPENS))
}
