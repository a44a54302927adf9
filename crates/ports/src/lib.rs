//! # storage-proxy-ports
//!
//! Port traits for the storage-proxy bridge.
//!
//! This crate defines the interfaces between the bridge and its
//! infrastructure: the remote metrics/configuration API, the management
//! registry and structured logging. It depends only on `domain` and `shared`.
//!
//! Ports are synchronous: every management accessor blocks the caller's
//! thread until the remote call completes.

pub mod logger;
pub mod management;
pub mod remote;

pub use logger::*;
pub use management::*;
pub use remote::*;

// Re-export domain types used in port signatures, so adapter crates can
// implement ports without naming `storage-proxy-domain` directly.
pub use storage_proxy_domain::{
    AttributeDescriptor, AttributeValue, ObjectName, OperationDescriptor, ValueType,
};

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
