//! Tabular rendering of backtest results, shared by the console and CSV output.

use crate::domain::backtest::{BacktestResult, DataSource};
use crate::domain::metrics::{InstrumentResult, Summary};
use crate::domain::period::PeriodRecord;
use chrono::NaiveDate;
use serde::Serialize;

pub const HEADERS: [&str; 8] = [
    "Period",
    "Holding Window",
    "Action",
    "Signal (%)",
    "Holding",
    "Start Price",
    "End Price",
    "Return (%)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub period: String,
    pub window: String,
    pub action: String,
    pub signal: String,
    pub holding: String,
    pub start_price: String,
    pub end_price: String,
    pub return_pct: String,
}

impl TableRow {
    fn cells(&self) -> [&str; 8] {
        [
            &self.period,
            &self.window,
            &self.action,
            &self.signal,
            &self.holding,
            &self.start_price,
            &self.end_price,
            &self.return_pct,
        ]
    }
}

fn month_label(date: NaiveDate) -> String {
    date.format("%Y/%m").to_string()
}

pub fn render_row(record: &PeriodRecord) -> TableRow {
    TableRow {
        period: month_label(record.rebalance_date),
        window: format!(
            "{}-{}",
            month_label(record.hold_start),
            month_label(record.hold_end)
        ),
        action: record.action.to_string(),
        signal: format!("{:+.2}", record.signal_pct),
        holding: record.selected.clone(),
        start_price: format!("{:.2}", record.start_price),
        end_price: format!("{:.2}", record.end_price),
        return_pct: format!("{:+.2}", record.return_pct),
    }
}

pub fn render_rows(periods: &[PeriodRecord]) -> Vec<TableRow> {
    periods.iter().map(render_row).collect()
}

/// Fixed-width text table with a header rule.
pub fn format_console_table(rows: &[TableRow]) -> String {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in rows {
        let line: Vec<String> = row
            .cells()
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                // text columns left-aligned, numeric right-aligned
                if i < 3 || i == 4 {
                    format!("{:<w$}", cell, w = w)
                } else {
                    format!("{:>w$}", cell, w = w)
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn format_optional_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.1}%", v),
        None => "n/a".to_string(),
    }
}

/// Summary block. Every statistic reads `n/a` when there are no periods.
pub fn format_summary(summary: Option<&Summary>) -> String {
    let get = |f: fn(&Summary) -> f64| summary.map(f);
    let mut out = String::new();
    out.push_str(&format!(
        "Periods:          {}\n",
        summary.map_or("0".to_string(), |s| s.periods.to_string())
    ));
    out.push_str(&format!(
        "Win Rate:         {}\n",
        get(|s| s.win_rate).map_or("n/a".to_string(), |v| format!("{:.1}%", v))
    ));
    out.push_str(&format!(
        "Average Return:   {}\n",
        format_optional_pct(get(|s| s.avg_return))
    ));
    out.push_str(&format!(
        "Best Period:      {}\n",
        format_optional_pct(get(|s| s.max_return))
    ));
    out.push_str(&format!(
        "Worst Period:     {}\n",
        format_optional_pct(get(|s| s.min_return))
    ));
    out.push_str(&format!(
        "Total Return:     {}\n",
        format_optional_pct(get(|s| s.total_return))
    ));
    out.push_str(&format!(
        "Annualized:       {}\n",
        format_optional_pct(summary.and_then(|s| s.annualized_return))
    ));
    out.push_str(&format!(
        "Switches:         {}\n",
        summary.map_or("n/a".to_string(), |s| s.switches.to_string())
    ));
    out
}

pub fn format_instrument_summary(results: &[InstrumentResult]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "  {}:  {} periods, {:.1}% win rate, avg {:+.1}%, compounded {:+.1}%\n",
                r.symbol, r.periods, r.win_rate, r.avg_return, r.compounded_return
            )
        })
        .collect()
}

pub fn format_header(result: &BacktestResult) -> String {
    let source = match result.source {
        DataSource::Provider => "provider data",
        DataSource::Sample => "SAMPLE data",
    };
    format!(
        "{} momentum: {} (positive) / {} (zero or negative), {} to {}, {}",
        result.instruments.reference,
        result.instruments.growth,
        result.instruments.defensive,
        result.start_date,
        result.end_date,
        source
    )
}
