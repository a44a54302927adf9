//! Declarative attribute catalog for the storage proxy management bean.
//!
//! Every management attribute and operation is one row in a `static` table.
//! The bridge interprets the rows generically: a row says where a value comes
//! from (a local latency aggregator or a remote resource path), how it is
//! decoded, and how a write is encoded. Deprecated attributes are rows that
//! point at the same source as their replacement and name it in
//! `deprecated_by`.

use crate::operation_class::{MetricField, OperationClass};
use crate::value::ValueType;
use serde::Serialize;

/// Well-known registry name of the storage proxy bean.
pub const STORAGE_PROXY_OBJECT_NAME: &str = "org.apache.cassandra.db:type=StorageProxy";

/// Schema-version key the backend uses for nodes it cannot reach.
pub const UNREACHABLE: &str = "UNREACHABLE";

/// Attribute and operation names.
pub mod names {
    /// Total hints written since startup.
    pub const TOTAL_HINTS: &str = "TotalHints";
    /// Global hinted handoff switch.
    pub const HINTED_HANDOFF_ENABLED: &str = "HintedHandoffEnabled";
    /// Datacenters with hinted handoff enabled.
    pub const HINTED_HANDOFF_ENABLED_BY_DC: &str = "HintedHandoffEnabledByDC";
    /// Comma separated datacenter list enabling hinted handoff (write-only).
    pub const HINTED_HANDOFF_ENABLED_BY_DC_LIST: &str = "HintedHandoffEnabledByDCList";
    /// Maximum hint window in milliseconds.
    pub const MAX_HINT_WINDOW: &str = "MaxHintWindow";
    /// Maximum concurrent hints in progress.
    pub const MAX_HINTS_IN_PROGRESS: &str = "MaxHintsInProgress";
    /// Hints currently in progress.
    pub const HINTS_IN_PROGRESS: &str = "HintsInProgress";
    /// Default RPC timeout.
    pub const RPC_TIMEOUT: &str = "RpcTimeout";
    /// Read RPC timeout.
    pub const READ_RPC_TIMEOUT: &str = "ReadRpcTimeout";
    /// Write RPC timeout.
    pub const WRITE_RPC_TIMEOUT: &str = "WriteRpcTimeout";
    /// Counter write RPC timeout.
    pub const COUNTER_WRITE_RPC_TIMEOUT: &str = "CounterWriteRpcTimeout";
    /// CAS contention timeout.
    pub const CAS_CONTENTION_TIMEOUT: &str = "CasContentionTimeout";
    /// Range RPC timeout.
    pub const RANGE_RPC_TIMEOUT: &str = "RangeRpcTimeout";
    /// Truncate RPC timeout.
    pub const TRUNCATE_RPC_TIMEOUT: &str = "TruncateRpcTimeout";
    /// Read repairs attempted.
    pub const READ_REPAIR_ATTEMPTED: &str = "ReadRepairAttempted";
    /// Blocking read repairs.
    pub const READ_REPAIR_REPAIRED_BLOCKING: &str = "ReadRepairRepairedBlocking";
    /// Background read repairs.
    pub const READ_REPAIR_REPAIRED_BACKGROUND: &str = "ReadRepairRepairedBackground";
    /// Schema version to live endpoints.
    pub const SCHEMA_VERSIONS: &str = "SchemaVersions";
    /// Native transport connection cap (no backend support).
    pub const NATIVE_TRANSPORT_MAX_CONCURRENT_CONNECTIONS: &str =
        "NativeTransportMaxConcurrentConnections";
    /// Reload trigger classes operation.
    pub const RELOAD_TRIGGER_CLASSES: &str = "reloadTriggerClasses";
}

/// Where an attribute's value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ReadRule {
    /// Local latency aggregator snapshot.
    Metric {
        /// Aggregator to read.
        class: OperationClass,
        /// Snapshot field.
        field: MetricField,
    },
    /// Remote GET on a resource path.
    Remote {
        /// Resource path relative to the API root.
        path: &'static str,
    },
    /// The attribute can only be written.
    WriteOnly,
    /// The attribute exists but has no backing resource.
    Unsupported,
}

/// How an attribute's value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WriteRule {
    /// No setter.
    ReadOnly,
    /// Remote POST with a single query parameter.
    Remote {
        /// Resource path relative to the API root.
        path: &'static str,
        /// Query parameter carrying the encoded value.
        param: &'static str,
    },
    /// A setter exists but has no backing resource.
    Unsupported,
}

/// One row of the attribute catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    /// Attribute name as seen by management consumers.
    pub name: &'static str,
    /// Decode and validation type.
    pub value_type: ValueType,
    /// Read rule.
    pub read: ReadRule,
    /// Write rule.
    pub write: WriteRule,
    /// Replacement attribute when this one is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_by: Option<&'static str>,
}

impl AttributeDescriptor {
    const fn metric(name: &'static str, class: OperationClass, field: MetricField) -> Self {
        Self {
            name,
            value_type: field.value_type(),
            read: ReadRule::Metric { class, field },
            write: WriteRule::ReadOnly,
            deprecated_by: None,
        }
    }

    const fn metric_alias(
        name: &'static str,
        class: OperationClass,
        field: MetricField,
        replacement: &'static str,
    ) -> Self {
        Self {
            deprecated_by: Some(replacement),
            ..Self::metric(name, class, field)
        }
    }

    const fn remote(name: &'static str, value_type: ValueType, path: &'static str) -> Self {
        Self {
            name,
            value_type,
            read: ReadRule::Remote { path },
            write: WriteRule::ReadOnly,
            deprecated_by: None,
        }
    }

    const fn remote_rw(
        name: &'static str,
        value_type: ValueType,
        path: &'static str,
        param: &'static str,
    ) -> Self {
        Self {
            write: WriteRule::Remote { path, param },
            ..Self::remote(name, value_type, path)
        }
    }

    const fn write_only(
        name: &'static str,
        value_type: ValueType,
        path: &'static str,
        param: &'static str,
    ) -> Self {
        Self {
            name,
            value_type,
            read: ReadRule::WriteOnly,
            write: WriteRule::Remote { path, param },
            deprecated_by: None,
        }
    }

    const fn unsupported(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            read: ReadRule::Unsupported,
            write: WriteRule::Unsupported,
            deprecated_by: None,
        }
    }

    /// Whether a getter exists.
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        !matches!(self.read, ReadRule::WriteOnly)
    }

    /// Whether a setter exists.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(self.write, WriteRule::ReadOnly)
    }

    /// Whether consumers should move to another attribute.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated_by.is_some()
    }
}

/// A zero-argument management operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    /// Operation name as seen by management consumers.
    pub name: &'static str,
    /// Resource path that receives the POST.
    pub path: &'static str,
}

use MetricField::{
    Count, RecentLatency, RecentLatencyHistogram, TotalLatency, TotalLatencyHistogram,
};
use OperationClass::{CasRead, CasWrite, RangeSlice, Read, Write};
use ValueType::{Boolean, Int, Long, StringListMap, StringSet};

/// Every attribute exposed by the storage proxy bean.
#[rustfmt::skip]
pub static STORAGE_PROXY_ATTRIBUTES: &[AttributeDescriptor] = &[
    // client request latency, canonical names
    AttributeDescriptor::metric("ClientRequestReadCount", Read, Count),
    AttributeDescriptor::metric("ClientRequestReadTotalLatencyMicros", Read, TotalLatency),
    AttributeDescriptor::metric("ClientRequestReadRecentLatencyMicros", Read, RecentLatency),
    AttributeDescriptor::metric("ClientRequestReadTotalLatencyHistogramMicros", Read, TotalLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestReadRecentLatencyHistogramMicros", Read, RecentLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestRangeSliceCount", RangeSlice, Count),
    AttributeDescriptor::metric("ClientRequestRangeSliceTotalLatencyMicros", RangeSlice, TotalLatency),
    AttributeDescriptor::metric("ClientRequestRangeSliceRecentLatencyMicros", RangeSlice, RecentLatency),
    AttributeDescriptor::metric("ClientRequestRangeSliceTotalLatencyHistogramMicros", RangeSlice, TotalLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestRangeSliceRecentLatencyHistogramMicros", RangeSlice, RecentLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestWriteCount", Write, Count),
    AttributeDescriptor::metric("ClientRequestWriteTotalLatencyMicros", Write, TotalLatency),
    AttributeDescriptor::metric("ClientRequestWriteRecentLatencyMicros", Write, RecentLatency),
    AttributeDescriptor::metric("ClientRequestWriteTotalLatencyHistogramMicros", Write, TotalLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestWriteRecentLatencyHistogramMicros", Write, RecentLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestCASReadCount", CasRead, Count),
    AttributeDescriptor::metric("ClientRequestCASReadTotalLatencyMicros", CasRead, TotalLatency),
    AttributeDescriptor::metric("ClientRequestCASReadRecentLatencyMicros", CasRead, RecentLatency),
    AttributeDescriptor::metric("ClientRequestCASReadTotalLatencyHistogramMicros", CasRead, TotalLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestCASReadRecentLatencyHistogramMicros", CasRead, RecentLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestCASWriteCount", CasWrite, Count),
    AttributeDescriptor::metric("ClientRequestCASWriteTotalLatencyMicros", CasWrite, TotalLatency),
    AttributeDescriptor::metric("ClientRequestCASWriteRecentLatencyMicros", CasWrite, RecentLatency),
    AttributeDescriptor::metric("ClientRequestCASWriteTotalLatencyHistogramMicros", CasWrite, TotalLatencyHistogram),
    AttributeDescriptor::metric("ClientRequestCASWriteRecentLatencyHistogramMicros", CasWrite, RecentLatencyHistogram),
    // legacy latency accessors
    AttributeDescriptor::metric_alias("ReadOperations", Read, Count, "ClientRequestReadCount"),
    AttributeDescriptor::metric_alias("TotalReadLatencyMicros", Read, TotalLatency, "ClientRequestReadTotalLatencyMicros"),
    AttributeDescriptor::metric_alias("RecentReadLatencyMicros", Read, RecentLatency, "ClientRequestReadRecentLatencyMicros"),
    AttributeDescriptor::metric_alias("TotalReadLatencyHistogramMicros", Read, TotalLatencyHistogram, "ClientRequestReadTotalLatencyHistogramMicros"),
    AttributeDescriptor::metric_alias("RecentReadLatencyHistogramMicros", Read, RecentLatencyHistogram, "ClientRequestReadRecentLatencyHistogramMicros"),
    AttributeDescriptor::metric_alias("RangeOperations", RangeSlice, Count, "ClientRequestRangeSliceCount"),
    AttributeDescriptor::metric_alias("TotalRangeLatencyMicros", RangeSlice, TotalLatency, "ClientRequestRangeSliceTotalLatencyMicros"),
    AttributeDescriptor::metric_alias("RecentRangeLatencyMicros", RangeSlice, RecentLatency, "ClientRequestRangeSliceRecentLatencyMicros"),
    AttributeDescriptor::metric_alias("TotalRangeLatencyHistogramMicros", RangeSlice, TotalLatencyHistogram, "ClientRequestRangeSliceTotalLatencyHistogramMicros"),
    AttributeDescriptor::metric_alias("RecentRangeLatencyHistogramMicros", RangeSlice, RecentLatencyHistogram, "ClientRequestRangeSliceRecentLatencyHistogramMicros"),
    AttributeDescriptor::metric_alias("WriteOperations", Write, Count, "ClientRequestWriteCount"),
    AttributeDescriptor::metric_alias("TotalWriteLatencyMicros", Write, TotalLatency, "ClientRequestWriteTotalLatencyMicros"),
    AttributeDescriptor::metric_alias("RecentWriteLatencyMicros", Write, RecentLatency, "ClientRequestWriteRecentLatencyMicros"),
    AttributeDescriptor::metric_alias("TotalWriteLatencyHistogramMicros", Write, TotalLatencyHistogram, "ClientRequestWriteTotalLatencyHistogramMicros"),
    AttributeDescriptor::metric_alias("RecentWriteLatencyHistogramMicros", Write, RecentLatencyHistogram, "ClientRequestWriteRecentLatencyHistogramMicros"),
    // hints
    AttributeDescriptor::remote(names::TOTAL_HINTS, Long, "storage_proxy/total_hints"),
    AttributeDescriptor::remote_rw(names::HINTED_HANDOFF_ENABLED, Boolean, "storage_proxy/hinted_handoff_enabled", "enable"),
    AttributeDescriptor::remote(names::HINTED_HANDOFF_ENABLED_BY_DC, StringSet, "storage_proxy/hinted_handoff_enabled_by_dc"),
    AttributeDescriptor::write_only(names::HINTED_HANDOFF_ENABLED_BY_DC_LIST, ValueType::String, "storage_proxy/hinted_handoff_enabled_by_dc_list", "dcs"),
    AttributeDescriptor::remote_rw(names::MAX_HINT_WINDOW, Int, "storage_proxy/max_hint_window", "ms"),
    AttributeDescriptor::remote_rw(names::MAX_HINTS_IN_PROGRESS, Int, "storage_proxy/max_hints_in_progress", "qs"),
    AttributeDescriptor::remote(names::HINTS_IN_PROGRESS, Int, "storage_proxy/hints_in_progress"),
    // rpc timeouts
    AttributeDescriptor::remote_rw(names::RPC_TIMEOUT, Long, "storage_proxy/rpc_timeout", "timeout"),
    AttributeDescriptor::remote_rw(names::READ_RPC_TIMEOUT, Long, "storage_proxy/read_rpc_timeout", "timeout"),
    AttributeDescriptor::remote_rw(names::WRITE_RPC_TIMEOUT, Long, "storage_proxy/write_rpc_timeout", "timeout"),
    AttributeDescriptor::remote_rw(names::COUNTER_WRITE_RPC_TIMEOUT, Long, "storage_proxy/counter_write_rpc_timeout", "timeout"),
    AttributeDescriptor::remote_rw(names::CAS_CONTENTION_TIMEOUT, Long, "storage_proxy/cas_contention_timeout", "timeout"),
    AttributeDescriptor::remote_rw(names::RANGE_RPC_TIMEOUT, Long, "storage_proxy/range_rpc_timeout", "timeout"),
    AttributeDescriptor::remote_rw(names::TRUNCATE_RPC_TIMEOUT, Long, "storage_proxy/truncate_rpc_timeout", "timeout"),
    // read repair
    AttributeDescriptor::remote(names::READ_REPAIR_ATTEMPTED, Long, "storage_proxy/read_repair_attempted"),
    AttributeDescriptor::remote(names::READ_REPAIR_REPAIRED_BLOCKING, Long, "storage_proxy/read_repair_repaired_blocking"),
    AttributeDescriptor::remote(names::READ_REPAIR_REPAIRED_BACKGROUND, Long, "storage_proxy/read_repair_repaired_background"),
    // schema
    AttributeDescriptor::remote(names::SCHEMA_VERSIONS, StringListMap, "storage_proxy/schema_versions"),
    // no backend resource exists for this one
    AttributeDescriptor::unsupported(names::NATIVE_TRANSPORT_MAX_CONCURRENT_CONNECTIONS, Long),
];

/// Every zero-argument operation exposed by the storage proxy bean.
pub static STORAGE_PROXY_OPERATIONS: &[OperationDescriptor] = &[OperationDescriptor {
    name: names::RELOAD_TRIGGER_CLASSES,
    path: "storage_proxy/reload_trigger_classes",
}];

/// Look up an attribute by exact name.
#[must_use]
pub fn find_attribute(name: &str) -> Option<&'static AttributeDescriptor> {
    STORAGE_PROXY_ATTRIBUTES
        .iter()
        .find(|descriptor| descriptor.name == name)
}

/// Look up an operation by exact name.
#[must_use]
pub fn find_operation(name: &str) -> Option<&'static OperationDescriptor> {
    STORAGE_PROXY_OPERATIONS
        .iter()
        .find(|descriptor| descriptor.name == name)
}
