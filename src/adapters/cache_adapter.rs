//! Time-bounded cache in front of a [`DataPort`].
//!
//! Successful fetches are kept per `(symbol, start, end)` until the TTL
//! expires. Failures are never cached.

use crate::domain::error::MomcheckError;
use crate::domain::series::BarSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

type CacheKey = (String, NaiveDate, NaiveDate);

pub struct CachingDataPort<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, BarSeries)>>,
}

impl<P: DataPort> CachingDataPort<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &CacheKey) -> Option<BarSeries> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some((stored, series)) if stored.elapsed() < self.ttl => Some(series.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

impl<P: DataPort> DataPort for CachingDataPort<P> {
    fn fetch_monthly_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<BarSeries, MomcheckError> {
        let key = (symbol.to_string(), start_date, end_date);
        if let Some(series) = self.lookup(&key) {
            debug!(symbol, %start_date, %end_date, "cache hit");
            return Ok(series);
        }

        debug!(symbol, %start_date, %end_date, "cache miss");
        let series = self.inner.fetch_monthly_bars(symbol, start_date, end_date)?;
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, (Instant::now(), series.clone()));
        }
        Ok(series)
    }
}
