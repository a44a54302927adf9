//! Management registry boundary contract.

use std::sync::Arc;
use storage_proxy_domain::{AttributeDescriptor, AttributeValue, ObjectName, OperationDescriptor};
use storage_proxy_shared::Result;

/// An object exposing named attributes and zero-argument operations to
/// management tooling.
pub trait ManagedBean: Send + Sync {
    /// Attribute metadata.
    fn attributes(&self) -> &'static [AttributeDescriptor];

    /// Operation metadata.
    fn operations(&self) -> &'static [OperationDescriptor];

    /// Read an attribute by name.
    fn get_attribute(&self, name: &str) -> Result<AttributeValue>;

    /// Write an attribute by name.
    fn set_attribute(&self, name: &str, value: AttributeValue) -> Result<()>;

    /// Invoke a zero-argument operation by name.
    fn invoke(&self, operation: &str) -> Result<()>;
}

/// Boundary contract for the platform management registry.
pub trait ManagementRegistryPort: Send + Sync {
    /// Make `bean` discoverable under `name`.
    ///
    /// Failures use `registry:registration`.
    fn register(&self, name: &ObjectName, bean: Arc<dyn ManagedBean>) -> Result<()>;
}
