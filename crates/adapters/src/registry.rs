//! In-process management registry.
//!
//! Plays the role of the platform MBean server for embedding hosts and
//! tests: beans are stored by object name and dispatched by attribute or
//! operation name.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use storage_proxy_domain::{AttributeValue, ObjectName};
use storage_proxy_ports::{ManagedBean, ManagementRegistryPort};
use storage_proxy_shared::{ErrorCode, ErrorEnvelope, Result};

/// Registry keeping beans in a process-local map.
#[derive(Default)]
pub struct InProcessMBeanServer {
    beans: RwLock<BTreeMap<ObjectName, Arc<dyn ManagedBean>>>,
}

impl InProcessMBeanServer {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bean registered under `name`.
    pub fn lookup(&self, name: &ObjectName) -> Result<Arc<dyn ManagedBean>> {
        self.beans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| not_registered(name))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<ObjectName> {
        self.beans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Remove the bean registered under `name`.
    pub fn unregister(&self, name: &ObjectName) -> Result<()> {
        self.beans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_registered(name))
    }

    /// Read `attribute` from the bean registered under `name`.
    pub fn get_attribute(&self, name: &ObjectName, attribute: &str) -> Result<AttributeValue> {
        self.lookup(name)?.get_attribute(attribute)
    }

    /// Write `attribute` on the bean registered under `name`.
    pub fn set_attribute(
        &self,
        name: &ObjectName,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()> {
        self.lookup(name)?.set_attribute(attribute, value)
    }

    /// Invoke `operation` on the bean registered under `name`.
    pub fn invoke(&self, name: &ObjectName, operation: &str) -> Result<()> {
        self.lookup(name)?.invoke(operation)
    }
}

impl std::fmt::Debug for InProcessMBeanServer {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("InProcessMBeanServer")
            .field("names", &self.names())
            .finish()
    }
}

impl ManagementRegistryPort for InProcessMBeanServer {
    fn register(&self, name: &ObjectName, bean: Arc<dyn ManagedBean>) -> Result<()> {
        let mut beans = self.beans.write().unwrap_or_else(PoisonError::into_inner);
        if beans.contains_key(name) {
            return Err(ErrorEnvelope::registration(format!(
                "an object is already registered as {name}"
            ))
            .with_metadata("objectName", name.as_str()));
        }
        beans.insert(name.clone(), bean);
        drop(beans);

        tracing::debug!(object_name = %name, "registered managed bean");
        Ok(())
    }
}

fn not_registered(name: &ObjectName) -> ErrorEnvelope {
    ErrorEnvelope::expected(
        ErrorCode::not_found(),
        format!("no object is registered as {name}"),
    )
    .with_metadata("objectName", name.as_str())
}
