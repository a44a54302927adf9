//! Estimated-histogram buckets.
//!
//! Offsets start at 1 µs and grow by a factor of 1.2 (at least +1 per step).
//! Bucket `i` counts values `v` with `offsets[i - 1] < v <= offsets[i]`;
//! bucket 0 also takes zero, and the final bucket takes everything above the
//! largest offset.

use std::sync::atomic::{AtomicU64, Ordering};

/// Number of bucket offsets.
pub const BUCKET_OFFSET_COUNT: usize = 90;

/// Number of buckets, including the overflow bucket.
pub const BUCKET_COUNT: usize = BUCKET_OFFSET_COUNT + 1;

/// Upper bounds (inclusive, microseconds) of every non-overflow bucket.
pub static BUCKET_OFFSETS: [u64; BUCKET_OFFSET_COUNT] = bucket_offsets();

#[allow(
    clippy::indexing_slicing,
    reason = "index is bounded by the loop condition"
)]
const fn bucket_offsets() -> [u64; BUCKET_OFFSET_COUNT] {
    let mut offsets = [0_u64; BUCKET_OFFSET_COUNT];
    let mut last = 1_u64;
    offsets[0] = last;
    let mut index = 1;
    while index < BUCKET_OFFSET_COUNT {
        // round(last * 1.2), half up
        let rounded = (last * 12 + 5) / 10;
        let next = if rounded > last { rounded } else { last + 1 };
        offsets[index] = next;
        last = next;
        index += 1;
    }
    offsets
}

/// Bucket a latency sample (microseconds) falls into.
#[must_use]
pub fn bucket_index(value_us: u64) -> usize {
    BUCKET_OFFSETS.partition_point(|&offset| offset < value_us)
}

/// Monotonic, lock-free bucket counters.
#[derive(Debug)]
pub struct LifetimeHistogram {
    buckets: [AtomicU64; BUCKET_COUNT],
}

impl LifetimeHistogram {
    /// Empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Count one sample in `bucket`. Out-of-range indices land in overflow.
    pub fn increment(&self, bucket: usize) {
        let slot = self
            .buckets
            .get(bucket)
            .or_else(|| self.buckets.last());
        if let Some(slot) = slot {
            slot.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Current bucket counts.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u64> {
        self.buckets
            .iter()
            .map(|bucket| bucket.load(Ordering::Relaxed))
            .collect()
    }
}

impl Default for LifetimeHistogram {
    fn default() -> Self {
        Self::new()
    }
}
