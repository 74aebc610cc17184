//! Configuration validation.
//!
//! Checks every field the backtest and provider stack read before any fetch runs.

use crate::domain::error::MomcheckError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const SYMBOL_KEYS: [&str; 3] = ["reference", "growth", "defensive"];

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MomcheckError> {
    validate_dates(config)?;
    validate_symbols(config)?;
    Ok(())
}

pub fn validate_provider_config(config: &dyn ConfigPort) -> Result<(), MomcheckError> {
    validate_data_directory(config)?;
    validate_max_attempts(config)?;
    validate_non_negative(config, "base_delay_ms")?;
    validate_non_negative(config, "cache_ttl_secs")?;
    Ok(())
}

pub fn validate_all(config: &dyn ConfigPort) -> Result<(), MomcheckError> {
    validate_backtest_config(config)?;
    validate_provider_config(config)
}

fn required_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, MomcheckError> {
    config
        .get_date("backtest", key)?
        .ok_or_else(|| MomcheckError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        })
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), MomcheckError> {
    let start_date = required_date(config, "start_date")?;
    let end_date = required_date(config, "end_date")?;

    if start_date > end_date {
        return Err(MomcheckError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must not be after end_date".to_string(),
        });
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), MomcheckError> {
    let mut seen: Vec<(String, &str)> = Vec::with_capacity(SYMBOL_KEYS.len());
    for key in SYMBOL_KEYS {
        let Some(symbol) = config.get_string("backtest", key) else {
            // absent keys fall back to the default instruments
            continue;
        };
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(MomcheckError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: "symbol must not be empty".to_string(),
            });
        }
        if let Some((_, other)) = seen.iter().find(|(s, _)| *s == symbol) {
            return Err(MomcheckError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{} is already used as the {} instrument", symbol, other),
            });
        }
        seen.push((symbol, key));
    }
    Ok(())
}

fn validate_data_directory(config: &dyn ConfigPort) -> Result<(), MomcheckError> {
    match config.get_string("data", "directory") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(MomcheckError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

fn validate_max_attempts(config: &dyn ConfigPort) -> Result<(), MomcheckError> {
    let value = config.get_int("provider", "max_attempts", 3);
    if value < 1 {
        return Err(MomcheckError::ConfigInvalid {
            section: "provider".to_string(),
            key: "max_attempts".to_string(),
            reason: "max_attempts must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Largest accepted delay or TTL value, in the key's own unit.
pub const MAX_PROVIDER_DURATION: f64 = u32::MAX as f64;

fn validate_non_negative(config: &dyn ConfigPort, key: &str) -> Result<(), MomcheckError> {
    let value = config.get_double("provider", key, 0.0);
    let reason = if !value.is_finite() {
        format!("{} must be a finite number", key)
    } else if value < 0.0 {
        format!("{} must be non-negative", key)
    } else if value > MAX_PROVIDER_DURATION {
        format!("{} must be at most {}", key, MAX_PROVIDER_DURATION)
    } else {
        return Ok(());
    };
    Err(MomcheckError::ConfigInvalid {
        section: "provider".to_string(),
        key: key.to_string(),
        reason,
    })
}
