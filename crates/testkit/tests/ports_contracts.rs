//! Contract-style tests for port traits using in-memory adapters.

use serde_json::json;
use std::sync::Arc;
use storage_proxy_domain::{
    AttributeDescriptor, AttributeValue, ObjectName, OperationDescriptor, STORAGE_PROXY_OBJECT_NAME,
    ValueType,
};
use storage_proxy_ports::{
    LoggerPort, ManagedBean, ManagementRegistryPort, RemoteClientPort, single_param,
};
use storage_proxy_shared::{ErrorCode, ErrorEnvelope, Result};
use storage_proxy_testkit::errors::registration_error;
use storage_proxy_testkit::in_memory::{
    InMemoryRemoteClient, NoopLogger, RecordedPost, RecordingRegistry,
};

struct EmptyBean;

impl ManagedBean for EmptyBean {
    fn attributes(&self) -> &'static [AttributeDescriptor] {
        &[]
    }

    fn operations(&self) -> &'static [OperationDescriptor] {
        &[]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        Err(ErrorEnvelope::expected(ErrorCode::not_found(), name))
    }

    fn set_attribute(&self, name: &str, _value: AttributeValue) -> Result<()> {
        Err(ErrorEnvelope::expected(ErrorCode::not_found(), name))
    }

    fn invoke(&self, operation: &str) -> Result<()> {
        Err(ErrorEnvelope::expected(ErrorCode::not_found(), operation))
    }
}

#[test]
fn remote_port_contract_smoke() -> Result<()> {
    let remote = InMemoryRemoteClient::new()
        .with_value("storage_proxy/hinted_handoff_enabled_by_dc", json!(["dc1"]))
        .with_value(
            "storage_proxy/schema_versions",
            json!({"v1": ["127.0.0.1"]}),
        );

    let dcs = remote.get_value(
        "storage_proxy/hinted_handoff_enabled_by_dc",
        ValueType::StringSet,
    )?;
    assert_eq!(dcs.value_type(), ValueType::StringSet);

    let versions = remote.get_string_list_map("storage_proxy/schema_versions")?;
    assert_eq!(versions.get("v1").map(Vec::len), Some(1));

    let unsupported = remote
        .get_value("storage_proxy/anything", ValueType::Double)
        .unwrap_err();
    assert_eq!(unsupported.code, ErrorCode::unsupported());

    remote.post(
        "storage_proxy/reload_trigger_classes",
        Vec::new(),
    )?;
    remote.post("storage_proxy/rpc_timeout", single_param("timeout", "5000"))?;
    assert_eq!(
        remote.posts(),
        vec![
            RecordedPost {
                path: "storage_proxy/reload_trigger_classes".into(),
                params: Vec::new(),
            },
            RecordedPost {
                path: "storage_proxy/rpc_timeout".into(),
                params: single_param("timeout", "5000"),
            },
        ]
    );
    assert_eq!(remote.value("storage_proxy/rpc_timeout"), Some(json!(5000)));
    Ok(())
}

#[test]
fn registry_port_contract_smoke() -> Result<()> {
    let name = ObjectName::parse(STORAGE_PROXY_OBJECT_NAME).map_err(ErrorEnvelope::from)?;

    let registry = RecordingRegistry::new();
    registry.register(&name, Arc::new(EmptyBean))?;
    assert_eq!(registry.registered_names(), vec![name.clone()]);
    assert!(registry.bean(&name).is_some());

    let refusing = RecordingRegistry::refusing(registration_error());
    let error = refusing.register(&name, Arc::new(EmptyBean)).unwrap_err();
    assert_eq!(error.code, ErrorCode::registration());
    assert!(refusing.registered_names().is_empty());
    Ok(())
}

#[test]
fn logger_port_contract_smoke() {
    let logger = NoopLogger;
    logger.info("storageProxy.test", "noop", None);
    let child = logger.child(Default::default());
    child.warn("storageProxy.test", "noop", None);
}
