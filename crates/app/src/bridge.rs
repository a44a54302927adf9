//! Catalog-driven dispatch for the storage proxy bean.
//!
//! Every attribute access goes through one routine: look the name up in the
//! static catalog, then serve it from the local aggregators (metric rules) or
//! with exactly one remote call (remote rules). Nothing is cached between
//! calls.

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use storage_proxy_domain::{
    AttributeDescriptor, AttributeValue, OperationDescriptor, ReadRule,
    STORAGE_PROXY_ATTRIBUTES, STORAGE_PROXY_OPERATIONS, WriteRule, find_attribute,
    find_operation,
};
use storage_proxy_metrics::ClientRequestMetrics;
use storage_proxy_ports::{
    LogFields, LogLevel, LoggerPort, ManagedBean, RemoteClientPort, single_param,
};
use storage_proxy_shared::{ErrorCode, ErrorEnvelope, Result};

/// Dependencies required by the bridge.
#[derive(Clone)]
pub struct StorageProxyBridgeDeps {
    /// Remote API client.
    pub remote: Arc<dyn RemoteClientPort>,
    /// Client-request latency aggregators.
    pub metrics: Arc<ClientRequestMetrics>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// The storage proxy management bean.
pub struct StorageProxyBridge {
    pub(crate) remote: Arc<dyn RemoteClientPort>,
    pub(crate) metrics: Arc<ClientRequestMetrics>,
    pub(crate) logger: Option<Arc<dyn LoggerPort>>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    Get,
    Set,
    Invoke,
}

impl Action {
    const fn event(self) -> &'static str {
        match self {
            Self::Get => "storageProxy.attribute.get",
            Self::Set => "storageProxy.attribute.set",
            Self::Invoke => "storageProxy.attribute.invoke",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Invoke => "invoke",
        }
    }
}

impl StorageProxyBridge {
    /// Build a bridge from its dependencies.
    #[must_use]
    pub fn new(deps: StorageProxyBridgeDeps) -> Self {
        Self {
            remote: deps.remote,
            metrics: deps.metrics,
            logger: deps.logger,
        }
    }

    /// Aggregators fed by the request-execution path.
    #[must_use]
    pub const fn metrics(&self) -> &Arc<ClientRequestMetrics> {
        &self.metrics
    }

    /// Attribute metadata, in catalog order.
    #[must_use]
    pub fn attributes(&self) -> &'static [AttributeDescriptor] {
        STORAGE_PROXY_ATTRIBUTES
    }

    /// Operation metadata.
    #[must_use]
    pub fn operations(&self) -> &'static [OperationDescriptor] {
        STORAGE_PROXY_OPERATIONS
    }

    /// Read an attribute by its external name.
    pub fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        self.observe(Action::Get, name, || self.read_attribute(name))
    }

    /// Write an attribute by its external name.
    ///
    /// The value must carry the attribute's declared type; mismatches are
    /// rejected before any remote call. There is no read-back.
    pub fn set_attribute(&self, name: &str, value: AttributeValue) -> Result<()> {
        self.observe(Action::Set, name, || self.write_attribute(name, &value))
    }

    /// Invoke a zero-argument operation by name.
    pub fn invoke(&self, name: &str) -> Result<()> {
        self.observe(Action::Invoke, name, || {
            let operation = find_operation(name).ok_or_else(|| {
                ErrorEnvelope::expected(
                    ErrorCode::not_found(),
                    format!("unknown operation {name}"),
                )
                .with_metadata("operation", name)
            })?;
            self.remote.post(operation.path, Vec::new())
        })
    }

    fn read_attribute(&self, name: &str) -> Result<AttributeValue> {
        let descriptor = lookup_attribute(name)?;
        match descriptor.read {
            ReadRule::Metric { class, field } => Ok(self.metrics.read(class, field)),
            ReadRule::Remote { path } => self.remote.get_value(path, descriptor.value_type),
            ReadRule::WriteOnly => Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                format!("attribute {name} is write-only"),
            )
            .with_metadata("attribute", name)),
            ReadRule::Unsupported => Err(unsupported(descriptor)),
        }
    }

    fn write_attribute(&self, name: &str, value: &AttributeValue) -> Result<()> {
        let descriptor = lookup_attribute(name)?;
        let (path, param) = match descriptor.write {
            WriteRule::Remote { path, param } => (path, param),
            WriteRule::ReadOnly => {
                return Err(ErrorEnvelope::expected(
                    ErrorCode::invalid_input(),
                    format!("attribute {name} is read-only"),
                )
                .with_metadata("attribute", name));
            },
            WriteRule::Unsupported => return Err(unsupported(descriptor)),
        };

        let actual = value.value_type();
        if actual != descriptor.value_type {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                format!(
                    "attribute {name} expects {} but got {actual}",
                    descriptor.value_type
                ),
            )
            .with_metadata("attribute", name)
            .with_metadata("expected", descriptor.value_type.as_str())
            .with_metadata("actual", actual.as_str()));
        }

        let encoded = value.to_param().ok_or_else(|| {
            ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                format!("{actual} values cannot be sent as a query parameter"),
            )
            .with_metadata("attribute", name)
        })?;
        self.remote.post(path, single_param(param, encoded))
    }

    pub(crate) fn log_call(&self, action: Action, name: &str) {
        if let Some(logger) = self.logger.as_ref() {
            logger.debug(action.event(), action.as_str(), Some(log_fields(action, name)));
        }
    }

    fn observe<T>(
        &self,
        action: Action,
        name: &str,
        call: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let started_at = Instant::now();
        self.log_call(action, name);

        let result = call();
        if let (Err(error), Some(logger)) = (&result, self.logger.as_ref()) {
            let mut fields = log_fields(action, name);
            fields.insert(
                "code".to_owned().into_boxed_str(),
                Value::String(error.code.to_string()),
            );
            fields.insert(
                "durationMs".to_owned().into_boxed_str(),
                Value::from(duration_ms(started_at)),
            );
            logger.failure(
                LogLevel::Warn,
                "storageProxy.attribute.failed",
                error,
                Some(fields),
            );
        }
        result
    }
}

impl ManagedBean for StorageProxyBridge {
    fn attributes(&self) -> &'static [AttributeDescriptor] {
        STORAGE_PROXY_ATTRIBUTES
    }

    fn operations(&self) -> &'static [OperationDescriptor] {
        STORAGE_PROXY_OPERATIONS
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        Self::get_attribute(self, name)
    }

    fn set_attribute(&self, name: &str, value: AttributeValue) -> Result<()> {
        Self::set_attribute(self, name, value)
    }

    fn invoke(&self, operation: &str) -> Result<()> {
        Self::invoke(self, operation)
    }
}

impl std::fmt::Debug for StorageProxyBridge {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StorageProxyBridge")
            .field("metrics", &self.metrics)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

fn lookup_attribute(name: &str) -> Result<&'static AttributeDescriptor> {
    find_attribute(name).ok_or_else(|| {
        ErrorEnvelope::expected(ErrorCode::not_found(), format!("unknown attribute {name}"))
            .with_metadata("attribute", name)
    })
}

fn unsupported(descriptor: &AttributeDescriptor) -> ErrorEnvelope {
    ErrorEnvelope::expected(
        ErrorCode::unsupported(),
        format!("attribute {} has no backing resource", descriptor.name),
    )
    .with_metadata("attribute", descriptor.name)
}

fn log_fields(action: Action, name: &str) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "attribute".to_owned().into_boxed_str(),
        Value::String(name.to_owned()),
    );
    fields.insert(
        "action".to_owned().into_boxed_str(),
        Value::String(action.as_str().to_owned()),
    );
    fields
}

fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}
