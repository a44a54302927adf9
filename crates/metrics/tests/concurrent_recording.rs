//! Recording and polling from many threads at once.

use std::sync::Arc;
use std::thread;
use storage_proxy_domain::{AttributeValue, MetricField, OperationClass};
use storage_proxy_metrics::{ClientRequestMetrics, ManualClock};

const WRITERS: u64 = 8;
const SAMPLES_PER_WRITER: u64 = 2_000;

#[test]
fn concurrent_writers_and_readers_agree_on_totals() {
    let metrics = ClientRequestMetrics::new(Arc::new(ManualClock::new()));

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let metrics = &metrics;
            scope.spawn(move || {
                for sample in 0..SAMPLES_PER_WRITER {
                    metrics.record(OperationClass::Read, writer * 10 + sample % 7);
                }
            });
        }
        for _ in 0..4 {
            let metrics = &metrics;
            scope.spawn(move || {
                let mut last = 0;
                for _ in 0..500 {
                    let count = metrics.aggregator(OperationClass::Read).count();
                    assert!(count >= last, "count went backwards");
                    last = count;
                }
            });
        }
    });

    let expected_count = WRITERS * SAMPLES_PER_WRITER;
    let expected_total: u64 = (0..WRITERS)
        .map(|writer| {
            (0..SAMPLES_PER_WRITER)
                .map(|sample| writer * 10 + sample % 7)
                .sum::<u64>()
        })
        .sum();

    let aggregator = metrics.aggregator(OperationClass::Read);
    assert_eq!(aggregator.count(), expected_count);
    assert_eq!(aggregator.total_latency_us(), expected_total);
    assert_eq!(
        aggregator.lifetime_histogram().iter().sum::<u64>(),
        expected_count
    );
    assert_eq!(
        aggregator.recent_histogram().iter().sum::<u64>(),
        expected_count
    );
}

#[test]
fn concurrent_pollers_see_the_same_snapshot() {
    let metrics = ClientRequestMetrics::new(Arc::new(ManualClock::new()));
    for latency in [10, 20, 30, 40] {
        metrics.record(OperationClass::Write, latency);
    }

    let reads: Vec<AttributeValue> = thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|_| {
                scope.spawn(|| metrics.read(OperationClass::Write, MetricField::RecentLatency))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert!(reads.iter().all(|value| *value == AttributeValue::Double(25.0)));
}
