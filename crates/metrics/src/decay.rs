//! Forward-decaying recent window.
//!
//! Each sample recorded at time `t` carries weight `exp(alpha * (t - landmark))`.
//! At read time the weights are scaled by `exp(-alpha * (now - landmark))`, so a
//! sample's contribution halves roughly every 46 seconds. The landmark moves
//! forward once an hour of activity has passed so weights stay finite.

use crate::histogram::BUCKET_COUNT;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Decay rate per second.
pub const DECAY_ALPHA_PER_SECOND: f64 = 0.015;

/// Landmark rescale period.
pub const RESCALE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Point-in-time view of the recent window.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentWindow {
    /// Decay-weighted mean latency in microseconds, `0.0` when empty.
    pub mean_latency_us: f64,
    /// Decayed bucket counts, rounded to the nearest integer.
    pub buckets: Vec<u64>,
}

#[derive(Debug)]
struct WindowState {
    landmark: Duration,
    weight: f64,
    weighted_sum: f64,
    buckets: [f64; BUCKET_COUNT],
}

impl WindowState {
    fn rescale(&mut self, now: Duration) {
        let factor = decay_factor(now.saturating_sub(self.landmark));
        self.weight *= factor;
        self.weighted_sum *= factor;
        for bucket in &mut self.buckets {
            *bucket *= factor;
        }
        self.landmark = now;
    }
}

/// Mutex-guarded decaying counters.
#[derive(Debug)]
pub struct DecayingWindow {
    state: Mutex<WindowState>,
}

impl DecayingWindow {
    /// Empty window with its landmark at `now`.
    #[must_use]
    pub const fn new(now: Duration) -> Self {
        Self {
            state: Mutex::new(WindowState {
                landmark: now,
                weight: 0.0,
                weighted_sum: 0.0,
                buckets: [0.0; BUCKET_COUNT],
            }),
        }
    }

    /// Add one sample observed at `now`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "latencies above 2^53 µs are not meaningful"
    )]
    pub fn record(&self, now: Duration, value_us: u64, bucket: usize) {
        let mut state = self.lock();
        if now.saturating_sub(state.landmark) >= RESCALE_INTERVAL {
            state.rescale(now);
        }
        let weight = growth_factor(now.saturating_sub(state.landmark));
        state.weight += weight;
        state.weighted_sum += weight * value_us as f64;
        let slot = bucket.min(BUCKET_COUNT - 1);
        if let Some(target) = state.buckets.get_mut(slot) {
            *target += weight;
        }
    }

    /// Read the window as of `now` without mutating it.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "decayed weights are non-negative and far below u64::MAX"
    )]
    pub fn snapshot(&self, now: Duration) -> RecentWindow {
        let state = self.lock();
        let mean_latency_us = if state.weight > 0.0 {
            state.weighted_sum / state.weight
        } else {
            0.0
        };
        let scale = decay_factor(now.saturating_sub(state.landmark));
        let buckets = state
            .buckets
            .iter()
            .map(|weight| (weight * scale).round() as u64)
            .collect();
        RecentWindow {
            mean_latency_us,
            buckets,
        }
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn growth_factor(age: Duration) -> f64 {
    (DECAY_ALPHA_PER_SECOND * age.as_secs_f64()).exp()
}

fn decay_factor(age: Duration) -> f64 {
    (-DECAY_ALPHA_PER_SECOND * age.as_secs_f64()).exp()
}
