//! Composition root: build the adapters and the bridge, then register it.
//!
//! Registration is the only startup step that can fail after config
//! validation. A failure is returned as `registry:registration`, and the
//! caller decides whether that is fatal.

use crate::logging::build_logger;
use serde_json::Value;
use std::sync::Arc;
use storage_proxy_adapters::{HttpRemoteClient, HttpRemoteClientConfig, LogSink};
use storage_proxy_app::{StorageProxyBridge, StorageProxyBridgeDeps};
use storage_proxy_config::ValidatedBridgeConfig;
use storage_proxy_domain::ObjectName;
use storage_proxy_metrics::ClientRequestMetrics;
use storage_proxy_ports::{
    LogFields, LogLevel, LoggerPort, ManagedBean, ManagementRegistryPort, RemoteClientPort,
};
use storage_proxy_shared::{ErrorCode, ErrorEnvelope, Result, redact_url_credentials};

/// Build the reqwest-backed remote client from config.
pub fn build_remote_client(config: &ValidatedBridgeConfig) -> Result<Arc<dyn RemoteClientPort>> {
    let client = HttpRemoteClient::new(HttpRemoteClientConfig::from_validated(config))?;
    Ok(Arc::new(client))
}

/// Build a bridge with fresh aggregators around `remote`.
pub fn build_bridge(
    config: &ValidatedBridgeConfig,
    remote: Arc<dyn RemoteClientPort>,
    logger: Option<Arc<dyn LoggerPort>>,
) -> StorageProxyBridge {
    tracing::debug!(
        object_name = %config.object_name(),
        base_url = %redact_url_credentials(config.base_url().as_str()),
        "building storage proxy bridge"
    );
    StorageProxyBridge::new(StorageProxyBridgeDeps {
        remote,
        metrics: Arc::new(ClientRequestMetrics::default()),
        logger,
    })
}

/// Build the HTTP client, JSON logger and bridge, and register the bridge
/// under `registry.objectName`.
pub fn bootstrap(
    config: &ValidatedBridgeConfig,
    registry: &dyn ManagementRegistryPort,
    sink: Arc<dyn LogSink>,
) -> Result<Arc<StorageProxyBridge>> {
    let remote = build_remote_client(config)?;
    let logger = build_logger(config, sink);
    bootstrap_with_client(config, registry, remote, logger)
}

/// Same as [`bootstrap`] with caller-supplied remote client and logger.
pub fn bootstrap_with_client(
    config: &ValidatedBridgeConfig,
    registry: &dyn ManagementRegistryPort,
    remote: Arc<dyn RemoteClientPort>,
    logger: Arc<dyn LoggerPort>,
) -> Result<Arc<StorageProxyBridge>> {
    let bridge = Arc::new(build_bridge(config, remote, Some(Arc::clone(&logger))));
    let name = config.object_name();

    let bean: Arc<dyn ManagedBean> = bridge.clone();
    if let Err(error) = registry.register(name, bean) {
        let error = registration_error(name, error);
        logger.failure(
            LogLevel::Error,
            "storageProxy.registration.failed",
            &error,
            Some(registered_fields(config)),
        );
        return Err(error);
    }

    logger.info(
        "storageProxy.registered",
        "storage proxy bean registered",
        Some(registered_fields(config)),
    );
    Ok(bridge)
}

fn registration_error(name: &ObjectName, error: ErrorEnvelope) -> ErrorEnvelope {
    if error.has_code(&ErrorCode::registration()) {
        return error.with_metadata("objectName", name.as_str());
    }
    ErrorEnvelope::registration(format!("failed to register {name}: {}", error.message))
        .with_metadata("objectName", name.as_str())
        .with_metadata("cause", error.code.to_string())
}

fn registered_fields(config: &ValidatedBridgeConfig) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "baseUrl".to_owned().into_boxed_str(),
        Value::String(redact_url_credentials(config.base_url().as_str())),
    );
    fields.insert(
        "timeoutMs".to_owned().into_boxed_str(),
        Value::from(config.api.timeout_ms),
    );
    fields
}
