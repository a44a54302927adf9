//! One latency aggregator per client-request class.

use crate::aggregator::LatencyAggregator;
use crate::clock::{Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use storage_proxy_domain::{AttributeValue, MetricField, OperationClass};

/// Aggregators for every [`OperationClass`], built once with the bridge.
#[derive(Debug)]
pub struct ClientRequestMetrics {
    read: LatencyAggregator,
    range_slice: LatencyAggregator,
    write: LatencyAggregator,
    cas_read: LatencyAggregator,
    cas_write: LatencyAggregator,
}

impl ClientRequestMetrics {
    /// Empty aggregators sharing `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let build = |class: OperationClass| {
            LatencyAggregator::new(class.metric_name(), class.label(), Arc::clone(&clock))
        };
        Self {
            read: build(OperationClass::Read),
            range_slice: build(OperationClass::RangeSlice),
            write: build(OperationClass::Write),
            cas_read: build(OperationClass::CasRead),
            cas_write: build(OperationClass::CasWrite),
        }
    }

    /// Aggregator for `class`.
    #[must_use]
    pub const fn aggregator(&self, class: OperationClass) -> &LatencyAggregator {
        match class {
            OperationClass::Read => &self.read,
            OperationClass::RangeSlice => &self.range_slice,
            OperationClass::Write => &self.write,
            OperationClass::CasRead => &self.cas_read,
            OperationClass::CasWrite => &self.cas_write,
        }
    }

    /// Feed one completed request.
    pub fn record(&self, class: OperationClass, latency_us: u64) {
        self.aggregator(class).record(latency_us);
    }

    /// Feed one completed request from a measured duration.
    pub fn record_duration(&self, class: OperationClass, latency: Duration) {
        self.aggregator(class).record_duration(latency);
    }

    /// Completed requests of `class`, clamped to `i64::MAX`.
    #[must_use]
    pub fn count(&self, class: OperationClass) -> i64 {
        saturating_i64(self.aggregator(class).count())
    }

    /// Cumulative latency of `class` in microseconds, clamped to `i64::MAX`.
    #[must_use]
    pub fn total_latency_us(&self, class: OperationClass) -> i64 {
        saturating_i64(self.aggregator(class).total_latency_us())
    }

    /// Decay-weighted mean latency of `class`.
    #[must_use]
    pub fn recent_latency_us(&self, class: OperationClass) -> f64 {
        self.aggregator(class).recent_latency_us()
    }

    /// Lifetime bucket counts of `class`.
    #[must_use]
    pub fn lifetime_histogram(&self, class: OperationClass) -> Vec<u64> {
        self.aggregator(class).lifetime_histogram()
    }

    /// Decayed bucket counts of `class`.
    #[must_use]
    pub fn recent_histogram(&self, class: OperationClass) -> Vec<u64> {
        self.aggregator(class).recent_histogram()
    }

    /// Current value of one field as an attribute value.
    #[must_use]
    pub fn read(&self, class: OperationClass, field: MetricField) -> AttributeValue {
        match field {
            MetricField::Count => AttributeValue::Long(self.count(class)),
            MetricField::TotalLatency => AttributeValue::Long(self.total_latency_us(class)),
            MetricField::RecentLatency => AttributeValue::Double(self.recent_latency_us(class)),
            MetricField::TotalLatencyHistogram => {
                AttributeValue::Histogram(self.lifetime_histogram(class))
            },
            MetricField::RecentLatencyHistogram => {
                AttributeValue::Histogram(self.recent_histogram(class))
            },
        }
    }
}

impl Default for ClientRequestMetrics {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
