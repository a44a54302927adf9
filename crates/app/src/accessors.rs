//! Typed accessors with the bean's external names.
//!
//! Remote accessors delegate to the generic dispatch so that catalog rules,
//! logging and error mapping stay in one place. Latency accessors read the
//! local aggregators and cannot fail.

use crate::bridge::{Action, StorageProxyBridge};
use std::collections::{BTreeMap, BTreeSet};
use storage_proxy_domain::{AttributeValue, OperationClass, names};
use storage_proxy_shared::Result;

macro_rules! client_request_accessors {
    (
        $class:expr, $label:literal,
        $count:ident, $total:ident, $recent:ident, $total_histogram:ident, $recent_histogram:ident
    ) => {
        #[doc = concat!("`ClientRequest", $label, "Count`: completed requests.")]
        #[must_use]
        pub fn $count(&self) -> i64 {
            self.log_call(Action::Get, concat!("ClientRequest", $label, "Count"));
            self.metrics.count($class)
        }

        #[doc = concat!("`ClientRequest", $label, "TotalLatencyMicros`: cumulative latency.")]
        #[must_use]
        pub fn $total(&self) -> i64 {
            self.log_call(Action::Get, concat!("ClientRequest", $label, "TotalLatencyMicros"));
            self.metrics.total_latency_us($class)
        }

        #[doc = concat!("`ClientRequest", $label, "RecentLatencyMicros`: decayed mean latency.")]
        #[must_use]
        pub fn $recent(&self) -> f64 {
            self.log_call(Action::Get, concat!("ClientRequest", $label, "RecentLatencyMicros"));
            self.metrics.recent_latency_us($class)
        }

        #[doc = concat!("`ClientRequest", $label, "TotalLatencyHistogramMicros`.")]
        #[must_use]
        pub fn $total_histogram(&self) -> Vec<u64> {
            self.log_call(
                Action::Get,
                concat!("ClientRequest", $label, "TotalLatencyHistogramMicros"),
            );
            self.metrics.lifetime_histogram($class)
        }

        #[doc = concat!("`ClientRequest", $label, "RecentLatencyHistogramMicros`.")]
        #[must_use]
        pub fn $recent_histogram(&self) -> Vec<u64> {
            self.log_call(
                Action::Get,
                concat!("ClientRequest", $label, "RecentLatencyHistogramMicros"),
            );
            self.metrics.recent_histogram($class)
        }
    };
}

macro_rules! legacy_latency_accessors {
    (
        $label:literal => $canonical_label:literal,
        $operations:ident => $count:ident,
        $total:ident => $canonical_total:ident,
        $recent:ident => $canonical_recent:ident,
        $total_histogram:ident => $canonical_total_histogram:ident,
        $recent_histogram:ident => $canonical_recent_histogram:ident
    ) => {
        #[doc = concat!(
            "Legacy `", $label, "Operations`; use `ClientRequest",
            $canonical_label,
            "Count`."
        )]
        #[deprecated(note = "use the matching ClientRequest accessor")]
        #[must_use]
        pub fn $operations(&self) -> i64 {
            self.$count()
        }

        #[doc = concat!(
            "Legacy `Total", $label, "LatencyMicros`; use `ClientRequest",
            $canonical_label,
            "TotalLatencyMicros`."
        )]
        #[deprecated(note = "use the matching ClientRequest accessor")]
        #[must_use]
        pub fn $total(&self) -> i64 {
            self.$canonical_total()
        }

        #[doc = concat!(
            "Legacy `Recent", $label, "LatencyMicros`; use `ClientRequest",
            $canonical_label,
            "RecentLatencyMicros`."
        )]
        #[deprecated(note = "use the matching ClientRequest accessor")]
        #[must_use]
        pub fn $recent(&self) -> f64 {
            self.$canonical_recent()
        }

        #[doc = concat!(
            "Legacy `Total", $label, "LatencyHistogramMicros`; use `ClientRequest",
            $canonical_label,
            "TotalLatencyHistogramMicros`."
        )]
        #[deprecated(note = "use the matching ClientRequest accessor")]
        #[must_use]
        pub fn $total_histogram(&self) -> Vec<u64> {
            self.$canonical_total_histogram()
        }

        #[doc = concat!(
            "Legacy `Recent", $label, "LatencyHistogramMicros`; use `ClientRequest",
            $canonical_label,
            "RecentLatencyHistogramMicros`."
        )]
        #[deprecated(note = "use the matching ClientRequest accessor")]
        #[must_use]
        pub fn $recent_histogram(&self) -> Vec<u64> {
            self.$canonical_recent_histogram()
        }
    };
}

/// Client-request latency.
impl StorageProxyBridge {
    client_request_accessors!(
        OperationClass::Read,
        "Read",
        get_client_request_read_count,
        get_client_request_read_total_latency_micros,
        get_client_request_read_recent_latency_micros,
        get_client_request_read_total_latency_histogram_micros,
        get_client_request_read_recent_latency_histogram_micros
    );
    client_request_accessors!(
        OperationClass::RangeSlice,
        "RangeSlice",
        get_client_request_range_slice_count,
        get_client_request_range_slice_total_latency_micros,
        get_client_request_range_slice_recent_latency_micros,
        get_client_request_range_slice_total_latency_histogram_micros,
        get_client_request_range_slice_recent_latency_histogram_micros
    );
    client_request_accessors!(
        OperationClass::Write,
        "Write",
        get_client_request_write_count,
        get_client_request_write_total_latency_micros,
        get_client_request_write_recent_latency_micros,
        get_client_request_write_total_latency_histogram_micros,
        get_client_request_write_recent_latency_histogram_micros
    );
    client_request_accessors!(
        OperationClass::CasRead,
        "CASRead",
        get_client_request_cas_read_count,
        get_client_request_cas_read_total_latency_micros,
        get_client_request_cas_read_recent_latency_micros,
        get_client_request_cas_read_total_latency_histogram_micros,
        get_client_request_cas_read_recent_latency_histogram_micros
    );
    client_request_accessors!(
        OperationClass::CasWrite,
        "CASWrite",
        get_client_request_cas_write_count,
        get_client_request_cas_write_total_latency_micros,
        get_client_request_cas_write_recent_latency_micros,
        get_client_request_cas_write_total_latency_histogram_micros,
        get_client_request_cas_write_recent_latency_histogram_micros
    );
}

/// Deprecated latency aliases.
impl StorageProxyBridge {
    legacy_latency_accessors!(
        "Read" => "Read",
        get_read_operations => get_client_request_read_count,
        get_total_read_latency_micros => get_client_request_read_total_latency_micros,
        get_recent_read_latency_micros => get_client_request_read_recent_latency_micros,
        get_total_read_latency_histogram_micros =>
            get_client_request_read_total_latency_histogram_micros,
        get_recent_read_latency_histogram_micros =>
            get_client_request_read_recent_latency_histogram_micros
    );
    legacy_latency_accessors!(
        "Range" => "RangeSlice",
        get_range_operations => get_client_request_range_slice_count,
        get_total_range_latency_micros => get_client_request_range_slice_total_latency_micros,
        get_recent_range_latency_micros => get_client_request_range_slice_recent_latency_micros,
        get_total_range_latency_histogram_micros =>
            get_client_request_range_slice_total_latency_histogram_micros,
        get_recent_range_latency_histogram_micros =>
            get_client_request_range_slice_recent_latency_histogram_micros
    );
    legacy_latency_accessors!(
        "Write" => "Write",
        get_write_operations => get_client_request_write_count,
        get_total_write_latency_micros => get_client_request_write_total_latency_micros,
        get_recent_write_latency_micros => get_client_request_write_recent_latency_micros,
        get_total_write_latency_histogram_micros =>
            get_client_request_write_total_latency_histogram_micros,
        get_recent_write_latency_histogram_micros =>
            get_client_request_write_recent_latency_histogram_micros
    );
}

/// Hints.
impl StorageProxyBridge {
    /// `TotalHints`.
    pub fn get_total_hints(&self) -> Result<i64> {
        self.get_attribute(names::TOTAL_HINTS)?.into_long()
    }

    /// `HintedHandoffEnabled`.
    pub fn get_hinted_handoff_enabled(&self) -> Result<bool> {
        self.get_attribute(names::HINTED_HANDOFF_ENABLED)?
            .into_boolean()
    }

    /// Set `HintedHandoffEnabled`.
    pub fn set_hinted_handoff_enabled(&self, enabled: bool) -> Result<()> {
        self.set_attribute(names::HINTED_HANDOFF_ENABLED, enabled.into())
    }

    /// `HintedHandoffEnabledByDC`: datacenters with hinted handoff enabled.
    pub fn get_hinted_handoff_enabled_by_dc(&self) -> Result<BTreeSet<String>> {
        self.get_attribute(names::HINTED_HANDOFF_ENABLED_BY_DC)?
            .into_string_set()
    }

    /// Set `HintedHandoffEnabledByDCList` (comma-separated datacenter names).
    pub fn set_hinted_handoff_enabled_by_dc_list(&self, dcs: &str) -> Result<()> {
        self.set_attribute(names::HINTED_HANDOFF_ENABLED_BY_DC_LIST, dcs.into())
    }

    /// `MaxHintWindow` in milliseconds.
    pub fn get_max_hint_window(&self) -> Result<i32> {
        self.get_attribute(names::MAX_HINT_WINDOW)?.into_int()
    }

    /// Set `MaxHintWindow` in milliseconds.
    pub fn set_max_hint_window(&self, ms: i32) -> Result<()> {
        self.set_attribute(names::MAX_HINT_WINDOW, ms.into())
    }

    /// `MaxHintsInProgress`.
    pub fn get_max_hints_in_progress(&self) -> Result<i32> {
        self.get_attribute(names::MAX_HINTS_IN_PROGRESS)?.into_int()
    }

    /// Set `MaxHintsInProgress`.
    pub fn set_max_hints_in_progress(&self, qs: i32) -> Result<()> {
        self.set_attribute(names::MAX_HINTS_IN_PROGRESS, qs.into())
    }

    /// `HintsInProgress`.
    pub fn get_hints_in_progress(&self) -> Result<i32> {
        self.get_attribute(names::HINTS_IN_PROGRESS)?.into_int()
    }
}

/// RPC timeouts, in milliseconds.
impl StorageProxyBridge {
    /// `RpcTimeout`.
    pub fn get_rpc_timeout(&self) -> Result<i64> {
        self.get_long(names::RPC_TIMEOUT)
    }

    /// Set `RpcTimeout`.
    pub fn set_rpc_timeout(&self, timeout_ms: i64) -> Result<()> {
        self.set_attribute(names::RPC_TIMEOUT, timeout_ms.into())
    }

    /// `ReadRpcTimeout`.
    pub fn get_read_rpc_timeout(&self) -> Result<i64> {
        self.get_long(names::READ_RPC_TIMEOUT)
    }

    /// Set `ReadRpcTimeout`.
    pub fn set_read_rpc_timeout(&self, timeout_ms: i64) -> Result<()> {
        self.set_attribute(names::READ_RPC_TIMEOUT, timeout_ms.into())
    }

    /// `WriteRpcTimeout`.
    pub fn get_write_rpc_timeout(&self) -> Result<i64> {
        self.get_long(names::WRITE_RPC_TIMEOUT)
    }

    /// Set `WriteRpcTimeout`.
    pub fn set_write_rpc_timeout(&self, timeout_ms: i64) -> Result<()> {
        self.set_attribute(names::WRITE_RPC_TIMEOUT, timeout_ms.into())
    }

    /// `CounterWriteRpcTimeout`.
    pub fn get_counter_write_rpc_timeout(&self) -> Result<i64> {
        self.get_long(names::COUNTER_WRITE_RPC_TIMEOUT)
    }

    /// Set `CounterWriteRpcTimeout`.
    pub fn set_counter_write_rpc_timeout(&self, timeout_ms: i64) -> Result<()> {
        self.set_attribute(names::COUNTER_WRITE_RPC_TIMEOUT, timeout_ms.into())
    }

    /// `CasContentionTimeout`.
    pub fn get_cas_contention_timeout(&self) -> Result<i64> {
        self.get_long(names::CAS_CONTENTION_TIMEOUT)
    }

    /// Set `CasContentionTimeout`.
    pub fn set_cas_contention_timeout(&self, timeout_ms: i64) -> Result<()> {
        self.set_attribute(names::CAS_CONTENTION_TIMEOUT, timeout_ms.into())
    }

    /// `RangeRpcTimeout`.
    pub fn get_range_rpc_timeout(&self) -> Result<i64> {
        self.get_long(names::RANGE_RPC_TIMEOUT)
    }

    /// Set `RangeRpcTimeout`.
    pub fn set_range_rpc_timeout(&self, timeout_ms: i64) -> Result<()> {
        self.set_attribute(names::RANGE_RPC_TIMEOUT, timeout_ms.into())
    }

    /// `TruncateRpcTimeout`.
    pub fn get_truncate_rpc_timeout(&self) -> Result<i64> {
        self.get_long(names::TRUNCATE_RPC_TIMEOUT)
    }

    /// Set `TruncateRpcTimeout`.
    pub fn set_truncate_rpc_timeout(&self, timeout_ms: i64) -> Result<()> {
        self.set_attribute(names::TRUNCATE_RPC_TIMEOUT, timeout_ms.into())
    }
}

/// Read repair, schema, and the rest.
impl StorageProxyBridge {
    /// `ReadRepairAttempted`.
    pub fn get_read_repair_attempted(&self) -> Result<i64> {
        self.get_long(names::READ_REPAIR_ATTEMPTED)
    }

    /// `ReadRepairRepairedBlocking`.
    pub fn get_read_repair_repaired_blocking(&self) -> Result<i64> {
        self.get_long(names::READ_REPAIR_REPAIRED_BLOCKING)
    }

    /// `ReadRepairRepairedBackground`.
    pub fn get_read_repair_repaired_background(&self) -> Result<i64> {
        self.get_long(names::READ_REPAIR_REPAIRED_BACKGROUND)
    }

    /// `SchemaVersions`: schema version to the endpoints reporting it.
    pub fn get_schema_versions(&self) -> Result<BTreeMap<String, Vec<String>>> {
        self.get_attribute(names::SCHEMA_VERSIONS)?
            .into_string_list_map()
    }

    /// `NativeTransportMaxConcurrentConnections`. Always `core:unsupported`.
    pub fn get_native_transport_max_concurrent_connections(&self) -> Result<i64> {
        self.get_long(names::NATIVE_TRANSPORT_MAX_CONCURRENT_CONNECTIONS)
    }

    /// Set `NativeTransportMaxConcurrentConnections`. Always `core:unsupported`.
    pub fn set_native_transport_max_concurrent_connections(&self, connections: i64) -> Result<()> {
        self.set_attribute(
            names::NATIVE_TRANSPORT_MAX_CONCURRENT_CONNECTIONS,
            AttributeValue::Long(connections),
        )
    }

    /// `reloadTriggerClasses` operation.
    pub fn reload_trigger_classes(&self) -> Result<()> {
        self.invoke(names::RELOAD_TRIGGER_CLASSES)
    }

    fn get_long(&self, name: &str) -> Result<i64> {
        self.get_attribute(name)?.into_long()
    }
}

#[cfg(test)]
mod tests {
    use crate::{StorageProxyBridge, StorageProxyBridgeDeps};
    use serde_json::json;
    use std::sync::Arc;
    use storage_proxy_domain::{AttributeValue, OperationClass};
    use storage_proxy_metrics::ClientRequestMetrics;
    use storage_proxy_shared::{ErrorCode, Result};
    use storage_proxy_testkit::in_memory::{InMemoryRemoteClient, RecordingLogger};

    fn bridge(remote: Arc<InMemoryRemoteClient>) -> StorageProxyBridge {
        StorageProxyBridge::new(StorageProxyBridgeDeps {
            remote,
            metrics: Arc::new(ClientRequestMetrics::default()),
            logger: None,
        })
    }

    #[test]
    #[allow(deprecated, reason = "legacy aliases must match their replacements")]
    fn legacy_aliases_match_canonical_accessors() -> Result<()> {
        let bridge = bridge(Arc::new(InMemoryRemoteClient::new()));
        for latency in [100, 200, 300] {
            bridge.metrics().record(OperationClass::RangeSlice, latency);
        }

        assert_eq!(bridge.get_range_operations(), 3);
        assert_eq!(bridge.get_client_request_range_slice_count(), 3);
        assert_eq!(bridge.get_total_range_latency_micros(), 600);
        assert_eq!(
            bridge.get_total_range_latency_histogram_micros(),
            bridge.get_client_request_range_slice_total_latency_histogram_micros()
        );
        assert_eq!(
            bridge.get_attribute("TotalRangeLatencyMicros")?,
            AttributeValue::Long(bridge.get_client_request_range_slice_total_latency_micros())
        );
        assert_eq!(bridge.get_read_operations(), 0);
        assert_eq!(bridge.get_write_operations(), 0);
        Ok(())
    }

    #[test]
    fn empty_aggregators_report_zeros() {
        let bridge = bridge(Arc::new(InMemoryRemoteClient::new()));
        assert_eq!(bridge.get_client_request_cas_write_count(), 0);
        assert_eq!(bridge.get_client_request_cas_read_total_latency_micros(), 0);
        assert!(bridge.get_client_request_write_recent_latency_micros().abs() < f64::EPSILON);
        assert!(
            bridge
                .get_client_request_read_recent_latency_histogram_micros()
                .iter()
                .all(|bucket| *bucket == 0)
        );
    }

    #[test]
    fn typed_setters_round_trip_through_the_backend() -> Result<()> {
        let remote = Arc::new(InMemoryRemoteClient::new());
        let bridge = bridge(Arc::clone(&remote));

        bridge.set_hinted_handoff_enabled(false)?;
        bridge.set_max_hint_window(3_600_000)?;
        bridge.set_truncate_rpc_timeout(60_000)?;

        assert!(!bridge.get_hinted_handoff_enabled()?);
        assert_eq!(bridge.get_max_hint_window()?, 3_600_000);
        assert_eq!(bridge.get_truncate_rpc_timeout()?, 60_000);
        Ok(())
    }

    #[test]
    fn dc_list_is_sent_as_the_dcs_parameter() -> Result<()> {
        let remote = Arc::new(InMemoryRemoteClient::new());
        let bridge = bridge(Arc::clone(&remote));

        bridge.set_hinted_handoff_enabled_by_dc_list("dc1,dc2")?;
        let posts = remote.posts();
        assert_eq!(posts[0].path, "storage_proxy/hinted_handoff_enabled_by_dc_list");
        assert_eq!(posts[0].params, storage_proxy_ports::single_param("dcs", "dc1,dc2"));
        Ok(())
    }

    #[test]
    fn collections_decode_from_the_backend() -> Result<()> {
        let remote = Arc::new(
            InMemoryRemoteClient::new()
                .with_value("storage_proxy/hinted_handoff_enabled_by_dc", json!(["dc2", "dc1"]))
                .with_value(
                    "storage_proxy/schema_versions",
                    json!({"v1": ["127.0.0.1"], "v2": []}),
                ),
        );
        let bridge = bridge(remote);

        let dcs = bridge.get_hinted_handoff_enabled_by_dc()?;
        assert_eq!(dcs.iter().map(String::as_str).collect::<Vec<_>>(), ["dc1", "dc2"]);
        let versions = bridge.get_schema_versions()?;
        assert_eq!(versions.len(), 2);
        assert!(versions.get("v2").is_some_and(Vec::is_empty));
        Ok(())
    }

    #[test]
    fn native_transport_connections_are_unsupported() {
        let remote = Arc::new(InMemoryRemoteClient::new());
        let bridge = bridge(Arc::clone(&remote));

        let get = bridge
            .get_native_transport_max_concurrent_connections()
            .unwrap_err();
        let set = bridge
            .set_native_transport_max_concurrent_connections(128)
            .unwrap_err();
        assert_eq!(get.code, ErrorCode::unsupported());
        assert_eq!(set.code, ErrorCode::unsupported());
        assert_eq!(remote.call_count(), 0);
    }

    #[test]
    fn reload_posts_without_parameters() -> Result<()> {
        let remote = Arc::new(InMemoryRemoteClient::new());
        let bridge = bridge(Arc::clone(&remote));
        bridge.reload_trigger_classes()?;

        let posts = remote.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].path, "storage_proxy/reload_trigger_classes");
        assert!(posts[0].params.is_empty());
        Ok(())
    }

    #[test]
    fn typed_metric_getters_agree_with_dispatch_and_log_alike() -> Result<()> {
        let logger = RecordingLogger::new();
        let bridge = StorageProxyBridge::new(StorageProxyBridgeDeps {
            remote: Arc::new(InMemoryRemoteClient::new()),
            metrics: Arc::new(ClientRequestMetrics::default()),
            logger: Some(Arc::new(logger.clone())),
        });
        bridge.metrics().record(OperationClass::CasRead, u64::MAX);
        bridge.metrics().record(OperationClass::CasRead, 10);

        let typed = bridge.get_client_request_cas_read_total_latency_micros();
        assert_eq!(typed, i64::MAX);
        assert_eq!(
            bridge.get_attribute("ClientRequestCASReadTotalLatencyMicros")?,
            AttributeValue::Long(typed)
        );

        let events = logger.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].fields, events[1].fields);
        let fields = events[0].fields.clone().unwrap_or_default();
        assert_eq!(fields.get("action"), Some(&json!("get")));
        assert_eq!(
            fields.get("attribute"),
            Some(&json!("ClientRequestCASReadTotalLatencyMicros"))
        );
        Ok(())
    }
}
