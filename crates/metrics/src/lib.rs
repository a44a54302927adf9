//! # storage-proxy-metrics
//!
//! Local latency aggregation for client requests coordinated by the storage
//! proxy.
//!
//! - **Clock** - injectable monotonic time source
//! - **Histogram** - estimated-histogram bucket offsets and lifetime buckets
//! - **Decay** - forward-decaying recent window
//! - **Aggregator** - one [`LatencyAggregator`] per operation class
//! - **Registry** - [`ClientRequestMetrics`], the per-class aggregator set
//!
//! Reads are snapshots: polling never resets or drains a value.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod aggregator;
pub mod clock;
pub mod decay;
pub mod histogram;
pub mod registry;

pub use aggregator::{LatencyAggregator, LatencySnapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use decay::{DECAY_ALPHA_PER_SECOND, DecayingWindow, RESCALE_INTERVAL, RecentWindow};
pub use histogram::{BUCKET_COUNT, BUCKET_OFFSETS, LifetimeHistogram, bucket_index};
pub use registry::ClientRequestMetrics;

/// Returns the metrics crate version.
#[must_use]
pub const fn metrics_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
