//! # storage-proxy-adapters
//!
//! Adapter implementations for ports (remote HTTP API, management registry,
//! structured logging).
//! This crate depends on `ports`, `shared`, `domain`, and `config`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod log_sink;
pub mod logger;
pub mod registry;
/// Remote API adapters.
#[cfg(feature = "http")]
pub mod remote;

pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::JsonLogger;
pub use registry::InProcessMBeanServer;
#[cfg(feature = "http")]
pub use remote::{HttpRemoteClient, HttpRemoteClientConfig};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
