//! Per-class latency aggregator.

use crate::clock::Clock;
use crate::decay::DecayingWindow;
use crate::histogram::{LifetimeHistogram, bucket_index};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Point-in-time copy of every value an aggregator exposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencySnapshot {
    /// Number of recorded operations.
    pub count: u64,
    /// Sum of recorded latencies in microseconds.
    pub total_latency_us: u64,
    /// Decay-weighted mean latency in microseconds.
    pub recent_latency_us: f64,
    /// Lifetime bucket counts.
    pub lifetime_histogram: Vec<u64>,
    /// Decayed bucket counts.
    pub recent_histogram: Vec<u64>,
}

/// Latency statistics for one client-request class.
///
/// Counters and lifetime buckets are atomics; the decaying window sits behind
/// a mutex. None of the read methods mutate state.
#[derive(Debug)]
pub struct LatencyAggregator {
    name: &'static str,
    label: &'static str,
    clock: Arc<dyn Clock>,
    count: AtomicU64,
    total_latency_us: AtomicU64,
    lifetime: LifetimeHistogram,
    recent: DecayingWindow,
}

impl LatencyAggregator {
    /// Empty aggregator reading time from `clock`.
    pub fn new(name: &'static str, label: &'static str, clock: Arc<dyn Clock>) -> Self {
        let recent = DecayingWindow::new(clock.now());
        Self {
            name,
            label,
            clock,
            count: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            lifetime: LifetimeHistogram::new(),
            recent,
        }
    }

    /// Metric family name, e.g. `storage_proxy/metrics/read`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Human label, e.g. `Read`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Record one completed operation.
    pub fn record(&self, latency_us: u64) {
        let bucket = bucket_index(latency_us);
        saturating_add(&self.count, 1);
        saturating_add(&self.total_latency_us, latency_us);
        self.lifetime.increment(bucket);
        self.recent.record(self.clock.now(), latency_us, bucket);
    }

    /// Record one completed operation from a measured duration.
    pub fn record_duration(&self, latency: Duration) {
        self.record(u64::try_from(latency.as_micros()).unwrap_or(u64::MAX));
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Sum of recorded latencies in microseconds.
    #[must_use]
    pub fn total_latency_us(&self) -> u64 {
        self.total_latency_us.load(Ordering::Relaxed)
    }

    /// Decay-weighted mean latency, `0.0` before the first sample.
    #[must_use]
    pub fn recent_latency_us(&self) -> f64 {
        self.recent.snapshot(self.clock.now()).mean_latency_us
    }

    /// Lifetime bucket counts.
    #[must_use]
    pub fn lifetime_histogram(&self) -> Vec<u64> {
        self.lifetime.snapshot()
    }

    /// Decayed bucket counts as of now.
    #[must_use]
    pub fn recent_histogram(&self) -> Vec<u64> {
        self.recent.snapshot(self.clock.now()).buckets
    }

    /// Every value at once.
    #[must_use]
    pub fn snapshot(&self) -> LatencySnapshot {
        let recent = self.recent.snapshot(self.clock.now());
        LatencySnapshot {
            count: self.count(),
            total_latency_us: self.total_latency_us(),
            recent_latency_us: recent.mean_latency_us,
            lifetime_histogram: self.lifetime_histogram(),
            recent_histogram: recent.buckets,
        }
    }
}

// Counters pin at `u64::MAX` instead of wrapping, so they never go down.
fn saturating_add(counter: &AtomicU64, delta: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_add(delta))
    });
}
