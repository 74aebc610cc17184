//! INI-backed [`ConfigPort`] for a momcheck run.
//!
//! Sections and keys read by the CLI:
//!
//! - `[backtest]`: `reference`, `growth`, `defensive`, `start_date`, `end_date`
//!   (`YYYY-MM-DD`) and `fallback_to_sample`.
//! - `[data]`: `directory`, holding one `<SYMBOL>.csv` per instrument.
//! - `[provider]`: `max_attempts`, `base_delay_ms` and `cache_ttl_secs`.
//! - `[report]`: `output`, the CSV report path.
//! - `[logging]`: `level`, an `EnvFilter` directive.
//!
//! Numeric and boolean values that do not parse fall back to the caller's
//! default with a warning; range checks live in `config_validation`.

use crate::domain::error::MomcheckError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MomcheckError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| MomcheckError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, MomcheckError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| MomcheckError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    /// Typed lookup: absent keys give `default` silently, unparseable ones warn.
    fn typed<T, F>(&self, section: &str, key: &str, default: T, parse: F) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        let Some(raw) = self.config.get(section, key) else {
            return default;
        };
        match parse(raw.trim()) {
            Some(value) => value,
            None => {
                warn!(section, key, value = %raw, "unparseable config value, using default");
                default
            }
        }
    }

    fn parse_number<T: FromStr>(value: &str) -> Option<T> {
        value.parse().ok()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.typed(section, key, default, Self::parse_number)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.typed(section, key, default, Self::parse_number)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.typed(section, key, default, Self::parse_bool)
    }
}
