//! # storage-proxy-infra
//!
//! Infrastructure wiring and runtime composition.
//! This crate depends on `app`, `adapters`, `config`, and `shared`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Bridge construction and registration.
pub mod bootstrap;
/// Logger wiring from config.
pub mod logging;

pub use bootstrap::{bootstrap, bootstrap_with_client, build_bridge, build_remote_client};
pub use logging::{build_logger, log_level};

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
