//! Catalog-wide behavior of the bridge over the in-memory backend.

use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use storage_proxy_app::{StorageProxyBridge, StorageProxyBridgeDeps};
use storage_proxy_domain::{
    AttributeValue, OperationClass, ReadRule, STORAGE_PROXY_ATTRIBUTES, ValueType, WriteRule,
};
use storage_proxy_metrics::{BUCKET_COUNT, ClientRequestMetrics, ManualClock, bucket_index};
use storage_proxy_ports::ManagedBean;
use storage_proxy_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use storage_proxy_testkit::in_memory::InMemoryRemoteClient;

fn sample_for(value_type: ValueType) -> serde_json::Value {
    match value_type {
        ValueType::Boolean => json!(true),
        ValueType::Int => json!(42),
        ValueType::Long => json!(10_000_000_000_i64),
        ValueType::StringSet => json!(["dc1"]),
        ValueType::StringListMap => json!({"v1": ["127.0.0.1"]}),
        ValueType::Double | ValueType::String | ValueType::Histogram => json!(null),
    }
}

fn new_bridge(
    remote: Arc<InMemoryRemoteClient>,
    metrics: Arc<ClientRequestMetrics>,
) -> StorageProxyBridge {
    StorageProxyBridge::new(StorageProxyBridgeDeps {
        remote,
        metrics,
        logger: None,
    })
}

#[test]
fn every_readable_attribute_decodes_to_its_declared_type() -> Result<()> {
    let remote = InMemoryRemoteClient::new();
    for descriptor in STORAGE_PROXY_ATTRIBUTES {
        if let ReadRule::Remote { path } = descriptor.read {
            remote.set_value(path, sample_for(descriptor.value_type));
        }
    }
    let remote = Arc::new(remote);
    let bridge = new_bridge(Arc::clone(&remote), Arc::new(ClientRequestMetrics::default()));

    let mut remote_reads = 0;
    for descriptor in STORAGE_PROXY_ATTRIBUTES {
        match descriptor.read {
            ReadRule::Metric { .. } | ReadRule::Remote { .. } => {
                let value = bridge.get_attribute(descriptor.name)?;
                assert_eq!(value.value_type(), descriptor.value_type, "{}", descriptor.name);
                if matches!(descriptor.read, ReadRule::Remote { .. }) {
                    remote_reads += 1;
                }
            },
            ReadRule::WriteOnly | ReadRule::Unsupported => {
                assert!(bridge.get_attribute(descriptor.name).is_err());
            },
        }
    }

    assert_eq!(remote.gets().len(), remote_reads);
    assert!(remote.posts().is_empty());
    Ok(())
}

#[test]
fn every_writable_attribute_posts_its_parameter() -> Result<()> {
    let remote = Arc::new(InMemoryRemoteClient::new());
    let bridge = new_bridge(Arc::clone(&remote), Arc::new(ClientRequestMetrics::default()));

    let mut expected = Vec::new();
    for descriptor in STORAGE_PROXY_ATTRIBUTES {
        let WriteRule::Remote { path, param } = descriptor.write else {
            continue;
        };
        let value = match descriptor.value_type {
            ValueType::Boolean => AttributeValue::Boolean(false),
            ValueType::Int => AttributeValue::Int(-5),
            ValueType::Long => AttributeValue::Long(9_000_000_000),
            ValueType::String => AttributeValue::from("dc1,dc2"),
            other => panic!("{} has non-scalar writable type {other}", descriptor.name),
        };
        let encoded = value.to_param().unwrap_or_default();
        bridge.set_attribute(descriptor.name, value)?;
        expected.push((path.to_string(), param.to_string(), encoded));
    }

    let posts: Vec<_> = remote
        .posts()
        .into_iter()
        .map(|post| {
            let (name, value) = post.params[0].clone();
            (post.path, name.into_string(), value.into_string())
        })
        .collect();
    assert_eq!(posts, expected);
    assert!(posts.iter().any(|(_, _, value)| value == "-5"));
    assert!(posts.iter().any(|(_, _, value)| value == "false"));
    Ok(())
}

#[test]
fn backend_failures_propagate_unchanged() {
    let remote = Arc::new(InMemoryRemoteClient::new());
    let bridge = new_bridge(Arc::clone(&remote), Arc::new(ClientRequestMetrics::default()));
    let failure = ErrorEnvelope::transport("connection refused", ErrorClass::Retriable);
    remote.fail_with(Some(failure.clone()));

    assert_eq!(bridge.get_total_hints().unwrap_err(), failure);
    assert_eq!(bridge.set_rpc_timeout(1_000).unwrap_err(), failure);
    assert_eq!(bridge.reload_trigger_classes().unwrap_err(), failure);

    // local metrics stay available while the backend is down
    assert_eq!(bridge.get_client_request_read_count(), 0);
}

#[test]
fn decode_failures_are_not_masked() {
    let remote = Arc::new(
        InMemoryRemoteClient::new().with_value("storage_proxy/hints_in_progress", json!("many")),
    );
    let bridge = new_bridge(remote, Arc::new(ClientRequestMetrics::default()));
    assert_eq!(
        bridge.get_hints_in_progress().unwrap_err().code,
        ErrorCode::decode()
    );
}

#[test]
fn bridge_is_usable_as_a_managed_bean() -> Result<()> {
    let remote = Arc::new(
        InMemoryRemoteClient::new().with_value("storage_proxy/read_repair_attempted", json!(3)),
    );
    let bean: Arc<dyn ManagedBean> = Arc::new(new_bridge(
        remote,
        Arc::new(ClientRequestMetrics::default()),
    ));

    assert_eq!(bean.attributes().len(), STORAGE_PROXY_ATTRIBUTES.len());
    assert_eq!(bean.operations().len(), 1);
    assert_eq!(
        bean.get_attribute("ReadRepairAttempted")?,
        AttributeValue::Long(3)
    );
    bean.invoke("reloadTriggerClasses")?;
    Ok(())
}

#[test]
fn recent_latency_decays_with_the_injected_clock() -> Result<()> {
    let clock = Arc::new(ManualClock::new());
    let metrics = Arc::new(ClientRequestMetrics::new(clock.clone()));
    let bridge = new_bridge(Arc::new(InMemoryRemoteClient::new()), Arc::clone(&metrics));

    for _ in 0..1_000 {
        metrics.record(OperationClass::Read, 100);
    }
    clock.advance(Duration::from_secs(60));

    let bucket = bucket_index(100);
    let recent = bridge.get_client_request_read_recent_latency_histogram_micros();
    let lifetime = bridge.get_client_request_read_total_latency_histogram_micros();
    assert_eq!(recent.len(), BUCKET_COUNT);
    assert_eq!(lifetime[bucket], 1_000);
    assert_eq!(recent[bucket], 407);
    assert!((bridge.get_client_request_read_recent_latency_micros() - 100.0).abs() < 1e-6);
    assert_eq!(
        bridge.get_attribute("RecentReadLatencyHistogramMicros")?,
        AttributeValue::Histogram(recent)
    );
    Ok(())
}

#[test]
fn concurrent_pollers_and_writers_share_one_bridge() {
    let remote = Arc::new(
        InMemoryRemoteClient::new().with_value("storage_proxy/total_hints", json!(5)),
    );
    let bridge = Arc::new(new_bridge(remote, Arc::new(ClientRequestMetrics::default())));

    thread::scope(|scope| {
        for _ in 0..4 {
            let bridge = Arc::clone(&bridge);
            scope.spawn(move || {
                for latency in 1..=500 {
                    bridge.metrics().record(OperationClass::CasWrite, latency);
                }
            });
        }
        for _ in 0..4 {
            let bridge = Arc::clone(&bridge);
            scope.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(bridge.get_total_hints().ok(), Some(5));
                    let count = bridge.get_client_request_cas_write_count();
                    assert!((0..=2_000).contains(&count));
                }
            });
        }
    });

    assert_eq!(bridge.get_client_request_cas_write_count(), 2_000);
    assert_eq!(
        bridge.get_client_request_cas_write_total_latency_micros(),
        4 * (500 * 501 / 2)
    );
}
