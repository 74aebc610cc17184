//! Periodic-rebalance backtest engine.
//!
//! Walks the aligned monthly axis in non-overlapping windows of
//! [`REBALANCE_WINDOW`] steps. Each window measures the reference momentum over
//! the step just before it, picks the growth or defensive instrument, and holds
//! it from the window's first open to its last open.

use crate::domain::alignment::{align, AlignedAxis, MIN_ALIGNED_DATES};
use crate::domain::error::MomcheckError;
use crate::domain::metrics::Summary;
use crate::domain::period::{return_pct, Action, PeriodRecord};
use crate::domain::series::BarSeries;
use crate::domain::signal::{momentum_signal, Holding, Instruments};
use crate::ports::data_port::DataPort;
use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, info};

/// Axis steps per holding window.
pub const REBALANCE_WINDOW: usize = 3;

/// Extra months requested before the start date so the first signal has a lookback bar.
pub const LOOKBACK_MONTHS: u32 = 1;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub instruments: Instruments,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Provider,
    Sample,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub instruments: Instruments,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub source: DataSource,
    pub aligned_dates: usize,
    pub periods: Vec<PeriodRecord>,
    /// `None` when there are no periods.
    pub summary: Option<Summary>,
}

impl BacktestResult {
    pub fn from_periods(
        config: &BacktestConfig,
        source: DataSource,
        aligned_dates: usize,
        periods: Vec<PeriodRecord>,
    ) -> Self {
        let summary = Summary::compute(&periods);
        Self {
            instruments: config.instruments.clone(),
            start_date: config.start_date,
            end_date: config.end_date,
            source,
            aligned_dates,
            periods,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Earliest date requested from the provider.
///
/// A start on the 1st reaches back `LOOKBACK_MONTHS` whole months. A mid-month
/// start is already past its own month's bar, so that bar is the lookback and
/// the first holding window cannot begin before `start`.
pub fn lookback_start(start: NaiveDate) -> NaiveDate {
    let Some(month_start) = start.with_day(1) else {
        return start;
    };
    if month_start < start {
        return month_start;
    }
    month_start
        .checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(start)
}

/// Produce one record per non-overlapping window of `axis`.
///
/// Window `k` starts at axis index `1 + 3k`; index 0 only serves as the first
/// lookback. An axis shorter than [`MIN_ALIGNED_DATES`] yields no records.
pub fn schedule(
    axis: &AlignedAxis,
    reference: &BarSeries,
    growth: &BarSeries,
    defensive: &BarSeries,
) -> Result<Vec<PeriodRecord>, MomcheckError> {
    let dates = axis.as_slice();
    let n = dates.len();
    if n < MIN_ALIGNED_DATES {
        return Ok(Vec::new());
    }

    let mut periods = Vec::with_capacity(n / REBALANCE_WINDOW);
    let mut current: Option<String> = None;
    let mut i = 1;

    while i + REBALANCE_WINDOW <= n {
        let signal_date = dates[i - 1];
        let hold_start = dates[i];
        let hold_end = dates[i + REBALANCE_WINDOW - 1];

        let signal_pct = momentum_signal(reference, signal_date, hold_start)?;
        let holding = Holding::from_signal(signal_pct);
        let series = match holding {
            Holding::Growth => growth,
            Holding::Defensive => defensive,
        };
        let selected = series.symbol().to_string();
        let action = Action::classify(current.as_deref(), &selected);

        let start_price = series.open_on(hold_start)?;
        let end_price = series.open_on(hold_end)?;

        debug!(
            %hold_start,
            %hold_end,
            signal_pct,
            %selected,
            %action,
            "rebalance window"
        );

        periods.push(PeriodRecord {
            rebalance_date: hold_start,
            signal_date,
            hold_start,
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
        i += REBALANCE_WINDOW;
    }

    Ok(periods)
}

/// Align and schedule already-fetched series. Returns the aligned length and
/// the records; too few common dates gives an empty record list.
pub fn run_on_series(
    reference: &BarSeries,
    growth: &BarSeries,
    defensive: &BarSeries,
) -> Result<(usize, Vec<PeriodRecord>), MomcheckError> {
    let axis = match align(reference, growth, defensive) {
        Ok(axis) => axis,
        Err(MomcheckError::InsufficientData { aligned, minimum }) => {
            info!(aligned, minimum, "not enough aligned dates for a rebalance window");
            return Ok((aligned, Vec::new()));
        }
        Err(e) => return Err(e),
    };
    let periods = schedule(&axis, reference, growth, defensive)?;
    Ok((axis.len(), periods))
}

/// Fetch one symbol; an empty payload is a fetch failure.
pub fn fetch_series(
    data_port: &dyn DataPort,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BarSeries, MomcheckError> {
    let series = data_port.fetch_monthly_bars(symbol, start, end)?;
    if series.is_empty() {
        return Err(MomcheckError::fetch(
            symbol,
            format!("no bars between {start} and {end}"),
        ));
    }
    debug!(symbol, bars = series.len(), "fetched series");
    Ok(series)
}

/// Fetch the three series sequentially, then align, schedule and summarize.
pub fn run_backtest(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
) -> Result<BacktestResult, MomcheckError> {
    if config.start_date > config.end_date {
        return Err(MomcheckError::ConfigInvalid {
            section: "backtest".into(),
            key: "start_date".into(),
            reason: "start_date must not be after end_date".into(),
        });
    }

    let fetch_start = lookback_start(config.start_date);
    let instruments = &config.instruments;
    info!(
        reference = %instruments.reference,
        growth = %instruments.growth,
        defensive = %instruments.defensive,
        %fetch_start,
        end = %config.end_date,
        "running backtest"
    );

    let reference = fetch_series(data_port, &instruments.reference, fetch_start, config.end_date)?;
    let growth = fetch_series(data_port, &instruments.growth, fetch_start, config.end_date)?;
    let defensive = fetch_series(data_port, &instruments.defensive, fetch_start, config.end_date)?;

    let (aligned, periods) = run_on_series(&reference, &growth, &defensive)?;
    info!(aligned, periods = periods.len(), "backtest complete");

    Ok(BacktestResult::from_periods(
        config,
        DataSource::Provider,
        aligned,
        periods,
    ))
}
