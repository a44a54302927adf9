//! Client-request operation classes and their latency metric fields.

use crate::value::ValueType;
use serde::Serialize;
use std::fmt;

/// Logical class of client request whose latency is aggregated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OperationClass {
    /// Single-partition reads.
    Read,
    /// Range (multi-partition) reads.
    RangeSlice,
    /// Writes.
    Write,
    /// Lightweight-transaction reads.
    CasRead,
    /// Lightweight-transaction writes.
    CasWrite,
}

impl OperationClass {
    /// Every class, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Read,
        Self::RangeSlice,
        Self::Write,
        Self::CasRead,
        Self::CasWrite,
    ];

    /// Metric family name on the backend API.
    #[must_use]
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::Read => "storage_proxy/metrics/read",
            Self::RangeSlice => "storage_proxy/metrics/range",
            Self::Write => "storage_proxy/metrics/write",
            Self::CasRead => "storage_proxy/metrics/cas_read",
            Self::CasWrite => "storage_proxy/metrics/cas_write",
        }
    }

    /// Human label, also the scope used in attribute names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::RangeSlice => "RangeSlice",
            Self::Write => "Write",
            Self::CasRead => "CASRead",
            Self::CasWrite => "CASWrite",
        }
    }

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Read => 0,
            Self::RangeSlice => 1,
            Self::Write => 2,
            Self::CasRead => 3,
            Self::CasWrite => 4,
        }
    }
}

impl fmt::Display for OperationClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// One of the five values each operation class exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricField {
    /// Number of recorded operations.
    Count,
    /// Cumulative latency in microseconds.
    TotalLatency,
    /// Decayed recent mean latency in microseconds.
    RecentLatency,
    /// Lifetime latency histogram.
    TotalLatencyHistogram,
    /// Decaying recent latency histogram.
    RecentLatencyHistogram,
}

impl MetricField {
    /// Every field, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Count,
        Self::TotalLatency,
        Self::RecentLatency,
        Self::TotalLatencyHistogram,
        Self::RecentLatencyHistogram,
    ];

    /// Type of the value the field reports.
    #[must_use]
    pub const fn value_type(self) -> ValueType {
        match self {
            Self::Count | Self::TotalLatency => ValueType::Long,
            Self::RecentLatency => ValueType::Double,
            Self::TotalLatencyHistogram | Self::RecentLatencyHistogram => ValueType::Histogram,
        }
    }

    /// Suffix of the canonical `ClientRequest{label}{suffix}` attribute name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::TotalLatency => "TotalLatencyMicros",
            Self::RecentLatency => "RecentLatencyMicros",
            Self::TotalLatencyHistogram => "TotalLatencyHistogramMicros",
            Self::RecentLatencyHistogram => "RecentLatencyHistogramMicros",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (position, class) in OperationClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), position);
        }
    }

    #[test]
    fn metric_names_are_unique_and_scoped() {
        let mut names: Vec<_> = OperationClass::ALL
            .iter()
            .map(|class| class.metric_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OperationClass::ALL.len());
        assert!(names.iter().all(|name| name.starts_with("storage_proxy/metrics/")));
    }
}
