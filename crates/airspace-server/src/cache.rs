//! Bounded-freshness cache for rate-limited upstream feeds.
//!
//! Holds the last successful result and when it was fetched. Refreshes are
//! single-flight: the async mutex is held across the upstream call, and
//! callers that queued behind an in-flight refresh reuse its outcome.
//! Refresh timestamps sit behind their own lock so readers never wait on an
//! upstream call.

use airspace_core::{FetchError, NoopMetrics, RiskMetrics};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct CacheEntry<T> {
    data: T,
    fetched_at: Instant,
}

#[derive(Clone, Copy)]
struct RefreshStamp {
    fetched_at: Instant,
    refreshed_at: DateTime<Utc>,
}

pub struct FreshnessCache<T> {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry<T>>>,
    stamp: RwLock<Option<RefreshStamp>>,
    /// Completed refresh attempts, successful or not
    attempts: AtomicU64,
    metrics: Arc<dyn RiskMetrics>,
}

impl<T: Clone + Default> FreshnessCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
            stamp: RwLock::new(None),
            attempts: AtomicU64::new(0),
            metrics: Arc::new(NoopMetrics),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn RiskMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return cached data while fresh, otherwise refresh through `fetch`.
    ///
    /// A failed refresh leaves the cache untouched and returns the previous
    /// data, or `T::default()` when nothing was ever fetched.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let seen_attempts = self.attempts.load(Ordering::Acquire);
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.ttl {
                tracing::debug!("using cached data ({}s old)", age.as_secs());
                return cached.data.clone();
            }
        }

        if self.attempts.load(Ordering::Acquire) != seen_attempts {
            // Another caller refreshed while this one waited for the lock.
            return current_data(&entry);
        }

        let result = fetch().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(data) => {
                let fetched_at = Instant::now();
                *entry = Some(CacheEntry {
                    data: data.clone(),
                    fetched_at,
                });
                if let Ok(mut stamp) = self.stamp.write() {
                    *stamp = Some(RefreshStamp {
                        fetched_at,
                        refreshed_at: Utc::now(),
                    });
                }
                data
            }
            Err(err) => {
                tracing::warn!("refresh failed, serving last known data: {}", err);
                self.metrics.fetch_failed();
                current_data(&entry)
            }
        }
    }

    /// Age of the cached data, if any was ever fetched.
    pub fn age(&self) -> Option<Duration> {
        self.last_stamp().map(|stamp| stamp.fetched_at.elapsed())
    }

    /// Wall-clock time of the last successful refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_stamp().map(|stamp| stamp.refreshed_at)
    }

    fn last_stamp(&self) -> Option<RefreshStamp> {
        self.stamp.read().ok().and_then(|stamp| *stamp)
    }
}

fn current_data<T: Clone + Default>(entry: &Option<CacheEntry<T>>) -> T {
    entry
        .as_ref()
        .map(|cached| cached.data.clone())
        .unwrap_or_default()
}
