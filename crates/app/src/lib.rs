//! # storage-proxy-app
//!
//! The storage proxy management bean: a declarative attribute catalog
//! dispatched to local latency aggregators or the remote API.
//! This crate depends on `ports`, `domain`, `metrics`, and `shared`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod accessors;
pub mod bridge;

pub use bridge::{StorageProxyBridge, StorageProxyBridgeDeps};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
