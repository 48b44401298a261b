//! Counter accumulator tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use proptest::prelude::*;
use webprom_core::{Counter, ErrorCode, LabelSet, Metric, MetricSnapshot};

fn labels(status: &str) -> LabelSet {
    LabelSet::new([("controller", "posts"), ("status", status)])
}

#[test]
fn observe_accumulates_per_label_set() {
    let c = Counter::new("http_requests_total", "Total HTTP requests.");
    c.observe(1.0, &labels("200")).unwrap();
    c.observe(2.0, &labels("200")).unwrap();
    c.increment(&labels("500")).unwrap();

    assert_eq!(c.get(&labels("200")), Some(3.0));
    assert_eq!(c.get(&labels("500")), Some(1.0));
    assert_eq!(c.get(&labels("404")), None);
}

#[test]
fn negative_amount_is_rejected_without_side_effects() {
    let c = Counter::new("c", "h");
    c.observe(5.0, &labels("200")).unwrap();

    let err = c.observe(-1.0, &labels("200")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidObservation);
    let err = c.observe(f64::NAN, &labels("201")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidObservation);

    assert_eq!(c.get(&labels("200")), Some(5.0));
    assert_eq!(c.get(&labels("201")), None);
}

#[test]
fn snapshot_keeps_first_observed_order() {
    let c = Counter::new("c", "h");
    for s in ["500", "200", "404", "200"] {
        c.increment(&labels(s)).unwrap();
    }
    let order: Vec<_> = c
        .snapshot()
        .into_iter()
        .map(|(l, _)| l.get("status").unwrap().to_string())
        .collect();
    assert_eq!(order, vec!["500", "200", "404"]);

    // reading twice does not change anything
    assert_eq!(c.snapshot(), c.snapshot());
}

#[test]
fn remove_and_reset() {
    let c = Counter::new("c", "h");
    c.increment(&labels("200")).unwrap();
    c.increment(&labels("500")).unwrap();

    assert_eq!(c.remove(&labels("200")), Some(1.0));
    assert_eq!(c.snapshot().len(), 1);
    c.reset();
    assert!(c.snapshot().is_empty());
}

#[test]
fn strict_labels_pin_first_key_set() {
    let c = Counter::new("c", "h").with_strict_labels(true);
    c.increment(&labels("200")).unwrap();

    let other = LabelSet::new([("controller", "posts")]);
    let err = c.increment(&other).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidObservation);
    assert_eq!(c.snapshot().len(), 1);

    // relaxed by default
    let loose = Counter::new("c", "h");
    loose.increment(&labels("200")).unwrap();
    loose.increment(&other).unwrap();
    assert_eq!(loose.snapshot().len(), 2);
}

#[test]
fn collect_reports_name_help_and_series() {
    let c = Counter::new("http_requests_total", "Total HTTP requests.");
    c.increment(&labels("200")).unwrap();
    match c.collect() {
        MetricSnapshot::Counter { name, help, series } => {
            assert_eq!(name, "http_requests_total");
            assert_eq!(help, "Total HTTP requests.");
            assert_eq!(series, vec![(labels("200"), 1.0)]);
        }
        other => panic!("unexpected snapshot: {other:?}"),
    }
}

#[test]
fn concurrent_increments_are_not_lost() {
    let c = Counter::new("c", "h");
    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..1000 {
                    c.increment(&labels("200")).unwrap();
                }
            });
        }
    });
    assert_eq!(c.get(&labels("200")), Some(8000.0));
}

proptest! {
    #[test]
    fn value_is_sum_of_amounts(amounts in proptest::collection::vec(0u32..10_000, 0..50)) {
        let c = Counter::new("c", "h");
        for a in &amounts {
            c.observe(f64::from(*a), &labels("200")).unwrap();
        }
        let expected: f64 = amounts.iter().map(|a| f64::from(*a)).sum();
        prop_assert_eq!(c.get(&labels("200")).unwrap_or(0.0), expected);
    }
}
