//! Performance summary over a backtest's period records.

use super::backtest::REBALANCE_WINDOW;
use super::period::{Action, PeriodRecord};

const PERIODS_PER_YEAR: f64 = 12.0;

/// Summary statistics. All percentages are in percent units (25.9 means +25.9%).
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub periods: usize,
    pub wins: usize,
    pub switches: usize,
    pub win_rate: f64,
    pub avg_return: f64,
    pub max_return: f64,
    pub min_return: f64,
    pub total_return: f64,
    pub years_elapsed: f64,
    /// `None` when no time has elapsed.
    pub annualized_return: Option<f64>,
}

impl Summary {
    /// Statistics for `periods` in chronological order; `None` for an empty list.
    pub fn compute(periods: &[PeriodRecord]) -> Option<Self> {
        if periods.is_empty() {
            return None;
        }

        let count = periods.len();
        let returns: Vec<f64> = periods.iter().map(|p| p.return_pct).collect();

        let wins = periods.iter().filter(|p| p.is_win()).count();
        let switches = periods
            .iter()
            .filter(|p| p.action == Action::Switched)
            .count();
        let avg_return = returns.iter().sum::<f64>() / count as f64;
        let max_return = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_return = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let total_return = compound(&returns);

        let years_elapsed = count as f64 * REBALANCE_WINDOW as f64 / PERIODS_PER_YEAR;
        let annualized_return = annualize(total_return, years_elapsed);

        Some(Summary {
            periods: count,
            wins,
            switches,
            win_rate: wins as f64 / count as f64 * 100.0,
            avg_return,
            max_return,
            min_return,
            total_return,
            years_elapsed,
            annualized_return,
        })
    }
}

/// (prod(1 + r/100) - 1) * 100, in the given order.
pub fn compound(returns_pct: &[f64]) -> f64 {
    let growth: f64 = returns_pct.iter().map(|r| 1.0 + r / 100.0).product();
    (growth - 1.0) * 100.0
}

/// ((1 + total/100)^(1/years) - 1) * 100
pub fn annualize(total_return_pct: f64, years: f64) -> Option<f64> {
    if years <= 0.0 {
        return None;
    }
    let annualized = ((1.0 + total_return_pct / 100.0).powf(1.0 / years) - 1.0) * 100.0;
    annualized.is_finite().then_some(annualized)
}

/// Per-instrument breakdown, in order of first selection.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentResult {
    pub symbol: String,
    pub periods: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_return: f64,
    pub compounded_return: f64,
}

impl InstrumentResult {
    pub fn compute_per_instrument(periods: &[PeriodRecord]) -> Vec<InstrumentResult> {
        let mut symbols: Vec<&str> = Vec::new();
        for p in periods {
            if !symbols.contains(&p.selected.as_str()) {
                symbols.push(&p.selected);
            }
        }

        symbols
            .into_iter()
            .map(|symbol| {
                let returns: Vec<f64> = periods
                    .iter()
                    .filter(|p| p.selected == symbol)
                    .map(|p| p.return_pct)
                    .collect();
                let count = returns.len();
                let wins = returns.iter().filter(|&&r| r > 0.0).count();
                InstrumentResult {
                    symbol: symbol.to_string(),
                    periods: count,
                    wins,
                    win_rate: wins as f64 / count as f64 * 100.0,
                    avg_return: returns.iter().sum::<f64>() / count as f64,
                    compounded_return: compound(&returns),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::return_pct;
    use crate::domain::signal::Holding;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn record(selected: &str, action: Action, ret: f64) -> PeriodRecord {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        PeriodRecord {
            rebalance_date: date,
            signal_date: date,
            hold_start: date,
            hold_end: date,
            signal_pct: if selected == "TQQQ" { 1.0 } else { -1.0 },
            holding: if selected == "TQQQ" {
                Holding::Growth
            } else {
                Holding::Defensive
            },
            selected: selected.to_string(),
            action,
            start_price: 100.0,
            end_price: 100.0 + ret,
            return_pct: ret,
        }
    }

    #[test]
    fn empty_periods_have_no_summary() {
        assert!(Summary::compute(&[]).is_none());
    }

    #[test]
    fn compounded_total_two_periods() {
        let periods = vec![
            record("TQQQ", Action::Initial, 25.9),
            record("GLD", Action::Switched, -2.4),
        ];
        let s = Summary::compute(&periods).unwrap();
        assert_relative_eq!(s.total_return, (1.259 * 0.976 - 1.0) * 100.0, epsilon = 1e-9);
        assert!((s.total_return - 22.88).abs() < 0.01);
    }

    #[test]
    fn sample_year_statistics() {
        // 2023 sample: +25.9, -2.4, +8.7, +3.1
        let periods = vec![
            record("TQQQ", Action::Initial, 25.9),
            record("GLD", Action::Switched, -2.4),
            record("TQQQ", Action::Switched, 8.7),
            record("GLD", Action::Switched, 3.1),
        ];
        let s = Summary::compute(&periods).unwrap();
        assert_eq!(s.periods, 4);
        assert_eq!(s.wins, 3);
        assert_eq!(s.switches, 3);
        assert_relative_eq!(s.win_rate, 75.0);
        assert_relative_eq!(s.avg_return, 8.825, epsilon = 1e-9);
        assert_relative_eq!(s.max_return, 25.9);
        assert_relative_eq!(s.min_return, -2.4);
        assert_relative_eq!(s.years_elapsed, 1.0);
        // one year elapsed: annualized equals total
        assert_relative_eq!(s.annualized_return.unwrap(), s.total_return, epsilon = 1e-9);
    }

    #[test]
    fn zero_return_is_not_a_win() {
        let periods = vec![record("GLD", Action::Initial, 0.0)];
        let s = Summary::compute(&periods).unwrap();
        assert_eq!(s.wins, 0);
        assert_relative_eq!(s.win_rate, 0.0);
        assert_relative_eq!(s.total_return, 0.0);
        assert_relative_eq!(s.annualized_return.unwrap(), 0.0);
    }

    #[test]
    fn annualize_half_year() {
        // two windows = six months
        let periods = vec![
            record("TQQQ", Action::Initial, 10.0),
            record("TQQQ", Action::Continued, 10.0),
        ];
        let s = Summary::compute(&periods).unwrap();
        assert_relative_eq!(s.years_elapsed, 0.5);
        assert_relative_eq!(s.total_return, 21.0, epsilon = 1e-9);
        assert_relative_eq!(s.annualized_return.unwrap(), (1.21_f64.powi(2) - 1.0) * 100.0, epsilon = 1e-9);
        assert_eq!(s.switches, 0);
    }

    #[test]
    fn annualize_requires_elapsed_time() {
        assert!(annualize(10.0, 0.0).is_none());
        assert_relative_eq!(annualize(10.0, 1.0).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn compounding_splits_recombine() {
        let returns = [25.9, -2.4, 8.7, 3.1, -16.0];
        let whole = compound(&returns);
        for k in 0..=returns.len() {
            let left = compound(&returns[..k]);
            let right = compound(&returns[k..]);
            let combined = ((1.0 + left / 100.0) * (1.0 + right / 100.0) - 1.0) * 100.0;
            assert_relative_eq!(combined, whole, max_relative = 1e-9);
        }
    }

    #[test]
    fn per_instrument_breakdown() {
        let periods = vec![
            record("TQQQ", Action::Initial, return_pct(25.50, 32.10)),
            record("GLD", Action::Switched, -2.4),
            record("TQQQ", Action::Switched, 8.7),
        ];
        let results = InstrumentResult::compute_per_instrument(&periods);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "TQQQ");
        assert_eq!(results[0].periods, 2);
        assert_eq!(results[0].wins, 2);
        assert_relative_eq!(results[0].win_rate, 100.0);
        assert_eq!(results[1].symbol, "GLD");
        assert_eq!(results[1].wins, 0);
        assert_relative_eq!(results[1].compounded_return, -2.4, epsilon = 1e-9);
    }
}
