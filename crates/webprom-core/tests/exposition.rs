//! Prometheus text rendering tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use webprom_core::exposition::{render, render_gauge, render_metric, RenderOptions};
use webprom_core::{Counter, Histogram, LabelSet, Metric};

#[test]
fn counter_lines() {
    let c = Counter::new("http_requests_total", "Total HTTP requests from web app.");
    c.increment(&LabelSet::new([("status", "200"), ("action", "show")]))
        .unwrap();

    let mut out = String::new();
    render_metric(&c.collect(), &RenderOptions::default(), &mut out);
    assert_eq!(
        out,
        "# HELP http_requests_total Total HTTP requests from web app.\n\
         # TYPE http_requests_total counter\n\
         http_requests_total{action=\"show\",status=\"200\"} 1\n"
    );
}

#[test]
fn histogram_lines_include_inf_sum_and_count() {
    let h = Histogram::new("d", "Durations.", [1.0, 0.5]).unwrap();
    h.observe(0.75, &LabelSet::new([("controller", "posts")]))
        .unwrap();

    let mut out = String::new();
    render_metric(&h.collect(), &RenderOptions::default(), &mut out);
    assert_eq!(
        out,
        "# HELP d Durations.\n\
         # TYPE d histogram\n\
         d_bucket{controller=\"posts\",le=\"0.5\"} 0\n\
         d_bucket{controller=\"posts\",le=\"1\"} 1\n\
         d_bucket{controller=\"posts\",le=\"+Inf\"} 1\n\
         d_sum{controller=\"posts\"} 0.75\n\
         d_count{controller=\"posts\"} 1\n"
    );
}

#[test]
fn unlabeled_histogram_has_no_braces_on_sum() {
    let h = Histogram::new("d", "Durations.", [1.0]).unwrap();
    h.observe(2.0, &LabelSet::empty()).unwrap();

    let mut out = String::new();
    render_metric(&h.collect(), &RenderOptions::default(), &mut out);
    assert!(out.contains("d_bucket{le=\"+Inf\"} 1\n"));
    assert!(out.contains("d_sum 2\n"));
    assert!(out.contains("d_count 1\n"));
}

#[test]
fn prefix_and_const_labels_apply_to_every_series() {
    let c = Counter::new("requests_total", "Requests.");
    c.increment(&LabelSet::new([("env", "staging"), ("status", "200")]))
        .unwrap();

    let opts = RenderOptions {
        prefix: "app_".into(),
        const_labels: LabelSet::new([("env", "prod"), ("host", "web-1")]),
    };
    let mut out = String::new();
    render(&[c.collect()], &opts, &mut out);
    assert!(out.contains("# TYPE app_requests_total counter"));
    assert!(out.contains("app_requests_total{env=\"staging\",host=\"web-1\",status=\"200\"} 1"));
}

#[test]
fn label_values_are_escaped() {
    let c = Counter::new("c", "h");
    c.increment(&LabelSet::new([("path", "a\"b\\c\nd")])).unwrap();
    let mut out = String::new();
    render_metric(&c.collect(), &RenderOptions::default(), &mut out);
    assert!(out.contains(r#"c{path="a\"b\\c\nd"} 1"#));
}

#[test]
fn empty_metrics_are_skipped() {
    let c = Counter::new("c", "h");
    let mut out = String::new();
    render_metric(&c.collect(), &RenderOptions::default(), &mut out);
    assert!(out.is_empty());
}

#[test]
fn gauge_carries_prefix_and_const_labels() {
    let opts = RenderOptions {
        prefix: "app_".into(),
        const_labels: LabelSet::new([("region", "eu")]),
    };
    let mut out = String::new();
    render_gauge("collector_draining", 1.0, &opts, &mut out);
    assert_eq!(
        out,
        "# TYPE app_collector_draining gauge\napp_collector_draining{region=\"eu\"} 1\n"
    );

    out.clear();
    render_gauge("up", 0.0, &RenderOptions::default(), &mut out);
    assert_eq!(out, "# TYPE up gauge\nup 0\n");
}
