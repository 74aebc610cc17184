//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for momcheck.
#[derive(Debug, thiserror::Error)]
pub enum MomcheckError {
    #[error("fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("insufficient data: {aligned} aligned dates, need {minimum}")]
    InsufficientData { aligned: usize, minimum: usize },

    #[error("missing observation for {symbol} on {date}")]
    MissingObservation { symbol: String, date: NaiveDate },

    #[error("duplicate bar for {symbol} on {date}")]
    DuplicateBar { symbol: String, date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MomcheckError {
    pub fn fetch(symbol: &str, reason: impl Into<String>) -> Self {
        MomcheckError::Fetch {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether a retry against the same provider could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MomcheckError::Fetch { .. })
    }
}

impl From<&MomcheckError> for std::process::ExitCode {
    fn from(err: &MomcheckError) -> Self {
        let code: u8 = match err {
            MomcheckError::Io(_) | MomcheckError::Csv(_) => 1,
            MomcheckError::ConfigParse { .. }
            | MomcheckError::ConfigMissing { .. }
            | MomcheckError::ConfigInvalid { .. } => 2,
            MomcheckError::Fetch { .. } => 3,
            MomcheckError::MissingObservation { .. } | MomcheckError::DuplicateBar { .. } => 4,
            MomcheckError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
