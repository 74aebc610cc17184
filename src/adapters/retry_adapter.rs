//! Retry-with-backoff wrapper around any [`DataPort`].

use crate::domain::error::MomcheckError;
use crate::domain::series::BarSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay slept after failed attempt `attempt` (1-based): `base_delay * attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

pub struct RetryingDataPort<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: DataPort> RetryingDataPort<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: DataPort> DataPort for RetryingDataPort<P> {
    fn fetch_monthly_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BarSeries, MomcheckError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let fetched = self
                .inner
                .fetch_monthly_bars(symbol, start_date, end_date)
                .and_then(|series| {
                    if series.is_empty() {
                        Err(MomcheckError::fetch(symbol, "empty payload"))
                    } else {
                        Ok(series)
                    }
                });
            match fetched {
                Ok(series) => return Ok(series),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        symbol,
                        attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "fetch failed, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
