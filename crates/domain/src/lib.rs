//! # storage-proxy-domain
//!
//! Domain model for the storage-proxy management bridge:
//!
//! - **Values** - `ValueType`, `AttributeValue` and their query-parameter encoding
//! - **Operation classes** - the five client-request classes with latency metrics
//! - **Catalog** - the fixed, declarative table of attributes and operations
//! - **Object names** - validated management registry names
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod catalog;
pub mod object_name;
pub mod operation_class;
pub mod value;

pub use catalog::{
    AttributeDescriptor, OperationDescriptor, ReadRule, STORAGE_PROXY_ATTRIBUTES,
    STORAGE_PROXY_OBJECT_NAME, STORAGE_PROXY_OPERATIONS, UNREACHABLE, WriteRule, find_attribute,
    find_operation, names,
};
pub use object_name::{ObjectName, ObjectNameError};
pub use operation_class::{MetricField, OperationClass};
pub use value::{AttributeValue, ValueType};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
