//! Observability hook for the detection pipeline.
//!
//! Components report what they drop, what fails and what they emit through
//! [`RiskMetrics`] so counts can be asserted on without parsing log output.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub trait RiskMetrics: Send + Sync {
    /// Raw records excluded by the normalizer.
    fn records_dropped(&self, count: usize);
    /// An upstream fetch failed and cached data was served instead.
    fn fetch_failed(&self);
    /// Alerts emitted by one detection run.
    fn alerts_produced(&self, count: usize);
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl RiskMetrics for NoopMetrics {
    fn records_dropped(&self, _count: usize) {}
    fn fetch_failed(&self) {}
    fn alerts_produced(&self, _count: usize) {}
}

/// Process-wide running totals.
#[derive(Debug, Default)]
pub struct CounterMetrics {
    records_dropped: AtomicU64,
    fetch_failures: AtomicU64,
    alerts_produced: AtomicU64,
    detection_runs: AtomicU64,
}

/// Point-in-time copy of [`CounterMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub records_dropped: u64,
    pub fetch_failures: u64,
    pub alerts_produced: u64,
    pub detection_runs: u64,
}

impl CounterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            alerts_produced: self.alerts_produced.load(Ordering::Relaxed),
            detection_runs: self.detection_runs.load(Ordering::Relaxed),
        }
    }
}

impl RiskMetrics for CounterMetrics {
    fn records_dropped(&self, count: usize) {
        self.records_dropped.fetch_add(count as u64, Ordering::Relaxed);
    }

    fn fetch_failed(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn alerts_produced(&self, count: usize) {
        self.alerts_produced.fetch_add(count as u64, Ordering::Relaxed);
        self.detection_runs.fetch_add(1, Ordering::Relaxed);
    }
}
