//! CLI definition and dispatch.

use chrono::{Local, Months, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::cache_adapter::CachingDataPort;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::retry_adapter::{RetryPolicy, RetryingDataPort};
use crate::adapters::table;
use crate::domain::alignment::MIN_ALIGNED_DATES;
use crate::domain::backtest::{self as engine, BacktestConfig, BacktestResult, DataSource};
use crate::domain::config_validation::{validate_all, validate_provider_config};
use crate::domain::error::MomcheckError;
use crate::domain::metrics::InstrumentResult;
use crate::domain::sample::{sample_instruments, sample_records};
use crate::domain::signal::{latest_recommendation, Instruments};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// Days of history fetched by `check`.
pub const CHECK_WINDOW_DAYS: u64 = 90;

/// Months of reference history fetched by `signal`.
const SIGNAL_LOOKBACK_MONTHS: u32 = 3;

const DEFAULT_CACHE_TTL_SECS: f64 = 1800.0;
const DEFAULT_BASE_DELAY_MS: i64 = 2000;

#[derive(Parser, Debug)]
#[command(
    name = "momcheck",
    about = "Bond-momentum rotation backtester (reference momentum picks growth or defensive)"
)]
pub struct Cli {
    /// Diagnostic log level on stderr (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the quarterly rotation backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [backtest] start_date
        #[arg(long, value_parser = parse_cli_date)]
        start: Option<NaiveDate>,
        /// Overrides [backtest] end_date
        #[arg(long, value_parser = parse_cli_date)]
        end: Option<NaiveDate>,
        /// CSV report path (overrides [report] output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fall back to the bundled sample data if fetching fails
        #[arg(long)]
        sample: bool,
    },
    /// Print the current recommendation from the latest reference bars
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        /// Evaluate as of this date instead of today
        #[arg(long, value_parser = parse_cli_date)]
        as_of: Option<NaiveDate>,
    },
    /// Fetch recent bars for each instrument to test the data source
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    pub fn config_path(&self) -> &Path {
        match self {
            Command::Backtest { config, .. }
            | Command::Signal { config, .. }
            | Command::Check { config }
            | Command::Validate { config } => config,
        }
    }
}

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

pub type ProviderStack = CachingDataPort<RetryingDataPort<CsvAdapter>>;

pub fn run(cli: Cli) -> ExitCode {
    let adapter = match load_config(cli.command.config_path()) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let level = cli
        .log_level
        .clone()
        .or_else(|| adapter.get_string("logging", "level"))
        .unwrap_or_else(|| "info".to_string());
    init_logging(&level);

    match cli.command {
        Command::Backtest {
            start,
            end,
            output,
            sample,
            ..
        } => run_backtest(&adapter, start, end, output.as_deref(), sample),
        Command::Signal { as_of, .. } => run_signal(&adapter, as_of),
        Command::Check { .. } => run_check(&adapter),
        Command::Validate { .. } => run_validate(&adapter),
    }
}

/// Install the stderr fmt subscriber. Later calls are no-ops.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn report_error(e: &MomcheckError) -> ExitCode {
    eprintln!("error: {e}");
    e.into()
}

pub fn build_instruments(adapter: &dyn ConfigPort) -> Instruments {
    let defaults = Instruments::default();
    let symbol = |key: &str, default: String| {
        adapter
            .get_string("backtest", key)
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
    };
    Instruments::new(
        symbol("reference", defaults.reference),
        symbol("growth", defaults.growth),
        symbol("defensive", defaults.defensive),
    )
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, MomcheckError> {
    let required = |key: &str| -> Result<NaiveDate, MomcheckError> {
        adapter
            .get_date("backtest", key)?
            .ok_or_else(|| MomcheckError::ConfigMissing {
                section: "backtest".into(),
                key: key.into(),
            })
    };

    Ok(BacktestConfig {
        instruments: build_instruments(adapter),
        start_date: required("start_date")?,
        end_date: required("end_date")?,
    })
}

pub fn build_retry_policy(adapter: &dyn ConfigPort) -> RetryPolicy {
    let max_attempts = adapter.get_int("provider", "max_attempts", 3).max(1);
    let base_delay_ms = adapter
        .get_int("provider", "base_delay_ms", DEFAULT_BASE_DELAY_MS)
        .max(0);
    RetryPolicy {
        max_attempts: u32::try_from(max_attempts).unwrap_or(u32::MAX),
        base_delay: Duration::from_millis(base_delay_ms as u64),
    }
}

pub fn build_data_port(adapter: &dyn ConfigPort) -> Result<ProviderStack, MomcheckError> {
    let directory = adapter
        .get_string("data", "directory")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| MomcheckError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })?;
    let ttl_secs = adapter
        .get_double("provider", "cache_ttl_secs", DEFAULT_CACHE_TTL_SECS)
        .max(0.0);
    let ttl = Duration::try_from_secs_f64(ttl_secs).map_err(|e| MomcheckError::ConfigInvalid {
        section: "provider".into(),
        key: "cache_ttl_secs".into(),
        reason: e.to_string(),
    })?;

    let csv = CsvAdapter::new(PathBuf::from(directory.trim()));
    let retrying = RetryingDataPort::new(csv, build_retry_policy(adapter));
    Ok(CachingDataPort::new(retrying, ttl))
}

fn run_backtest(
    adapter: &FileConfigAdapter,
    start_override: Option<NaiveDate>,
    end_override: Option<NaiveDate>,
    output_override: Option<&Path>,
    sample_flag: bool,
) -> ExitCode {
    if let Err(e) = validate_all(adapter) {
        return report_error(&e);
    }

    let mut bt_config = match build_backtest_config(adapter) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    if let Some(start) = start_override {
        bt_config.start_date = start;
    }
    if let Some(end) = end_override {
        bt_config.end_date = end;
    }

    let data_port = match build_data_port(adapter) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };

    let fallback = sample_flag || adapter.get_bool("backtest", "fallback_to_sample", false);
    let output = output_override
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from));

    run_backtest_pipeline(&data_port, &bt_config, output.as_deref(), fallback)
}

/// Result built from the canned sample records, labelled as sample data.
pub fn sample_result(bt_config: &BacktestConfig) -> BacktestResult {
    let periods = sample_records(bt_config.start_date, bt_config.end_date);
    let config = BacktestConfig {
        instruments: sample_instruments(),
        ..bt_config.clone()
    };
    let aligned = if periods.is_empty() {
        0
    } else {
        periods.len() * engine::REBALANCE_WINDOW + 1
    };
    BacktestResult::from_periods(&config, DataSource::Sample, aligned, periods)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    output_path: Option<&Path>,
    fallback_to_sample: bool,
) -> ExitCode {
    eprintln!(
        "Running backtest: {} to {}",
        bt_config.start_date, bt_config.end_date
    );

    let result = match engine::run_backtest(data_port, bt_config) {
        Ok(r) => r,
        Err(e @ MomcheckError::Fetch { .. }) if fallback_to_sample => {
            warn!(error = %e, "data source unavailable, using sample data");
            eprintln!("warning: {e}");
            eprintln!("warning: showing SAMPLE data, not live results");
            sample_result(bt_config)
        }
        Err(e) => return report_error(&e),
    };

    print_result(&result);

    if result.is_empty() {
        eprintln!(
            "No results for this range ({} aligned monthly bars, need at least {}). Try widening the date range.",
            result.aligned_dates, MIN_ALIGNED_DATES
        );
        return ExitCode::from(5);
    }

    if let Some(path) = output_path {
        if let Err(e) = CsvReportAdapter::new().write(&result, path) {
            return report_error(&e);
        }
        eprintln!("\nReport written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_result(result: &BacktestResult) {
    println!("{}", table::format_header(result));
    println!();

    if !result.is_empty() {
        print!(
            "{}",
            table::format_console_table(&table::render_rows(&result.periods))
        );
        println!();
    }

    println!("=== Summary ===");
    print!("{}", table::format_summary(result.summary.as_ref()));

    let per_instrument = InstrumentResult::compute_per_instrument(&result.periods);
    if !per_instrument.is_empty() {
        println!("\n=== Per-Instrument Summary ===");
        print!("{}", table::format_instrument_summary(&per_instrument));
    }
}

fn run_signal(adapter: &FileConfigAdapter, as_of: Option<NaiveDate>) -> ExitCode {
    if let Err(e) = validate_provider_config(adapter) {
        return report_error(&e);
    }
    let data_port = match build_data_port(adapter) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };
    let instruments = build_instruments(adapter);
    let end = as_of.unwrap_or_else(|| Local::now().date_naive());

    match signal_for(&data_port, &instruments, end) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

/// One-line recommendation from the last two reference bars up to `end`.
pub fn signal_for(
    data_port: &dyn DataPort,
    instruments: &Instruments,
    end: NaiveDate,
) -> Result<String, MomcheckError> {
    let start = end
        .checked_sub_months(Months::new(SIGNAL_LOOKBACK_MONTHS))
        .unwrap_or(end);
    let reference = engine::fetch_series(data_port, &instruments.reference, start, end)?;
    let rec = latest_recommendation(&reference, instruments)?;
    info!(symbol = %rec.symbol, signal_pct = rec.signal_pct, "current recommendation");

    Ok(format!(
        "{} momentum {} -> {}: {:+.2}%  hold {} ({})",
        instruments.reference, rec.from, rec.to, rec.signal_pct, rec.symbol, rec.holding
    ))
}

fn run_check(adapter: &FileConfigAdapter) -> ExitCode {
    if let Err(e) = validate_provider_config(adapter) {
        return report_error(&e);
    }
    let data_port = match build_data_port(adapter) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };
    let instruments = build_instruments(adapter);
    let end = Local::now().date_naive();
    check_instruments(&data_port, &instruments, end)
}

/// Fetch the last [`CHECK_WINDOW_DAYS`] for each instrument and print what came back.
/// Succeeds only if all three fetches do.
pub fn check_instruments(
    data_port: &dyn DataPort,
    instruments: &Instruments,
    end: NaiveDate,
) -> ExitCode {
    let start = end - chrono::Duration::days(CHECK_WINDOW_DAYS as i64);
    let mut first_error: Option<MomcheckError> = None;

    for symbol in [
        &instruments.reference,
        &instruments.growth,
        &instruments.defensive,
    ] {
        match engine::fetch_series(data_port, symbol, start, end) {
            Ok(series) => {
                let last = series.bars().last();
                println!(
                    "  {}: OK, {} bars, latest {} close {}",
                    symbol,
                    series.len(),
                    last.map_or("-".to_string(), |b| b.date.to_string()),
                    last.map_or("-".to_string(), |b| format!("{:.2}", b.close)),
                );
            }
            Err(e) => {
                println!("  {}: FAILED ({})", symbol, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        None => {
            eprintln!("All instruments reachable");
            ExitCode::SUCCESS
        }
        Some(e) => (&e).into(),
    }
}

fn run_validate(adapter: &FileConfigAdapter) -> ExitCode {
    match validate_all(adapter) {
        Ok(()) => {
            let instruments = build_instruments(adapter);
            eprintln!("Config validated successfully");
            eprintln!(
                "  reference {} / growth {} / defensive {}",
                instruments.reference, instruments.growth, instruments.defensive
            );
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}
