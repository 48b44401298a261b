//! Prometheus text exposition (format 0.0.4).
//!
//! Renders `MetricSnapshot`s; never touches live accumulators. Metrics with no
//! series are skipped, including their HELP/TYPE header.

use std::fmt::Write;

use crate::labels::LabelSet;
use crate::metric::MetricSnapshot;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Rendering options shared by every metric of one scrape.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Prepended to every metric name.
    pub prefix: String,
    /// Merged under each series' labels; series labels win.
    pub const_labels: LabelSet,
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// `k="v",k2="v2"` without braces.
fn label_pairs(labels: &LabelSet) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn braced(pairs: &str) -> String {
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{pairs}}}")
    }
}

/// Append one metric to `out`.
pub fn render_metric(metric: &MetricSnapshot, opts: &RenderOptions, out: &mut String) {
    if metric.series_len() == 0 {
        return;
    }
    let name = format!("{}{}", opts.prefix, metric.name());
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(metric.help()));
    let _ = writeln!(out, "# TYPE {} {}", name, metric.kind().as_str());

    match metric {
        MetricSnapshot::Counter { series, .. } => {
            for (labels, value) in series {
                let labels = opts.const_labels.merge(labels);
                let _ = writeln!(out, "{}{} {}", name, braced(&label_pairs(&labels)), value);
            }
        }
        MetricSnapshot::Histogram {
            thresholds, series, ..
        } => {
            for (labels, state) in series {
                let label_str = label_pairs(&opts.const_labels.merge(labels));
                let prefix = if label_str.is_empty() {
                    String::new()
                } else {
                    format!("{label_str},")
                };

                for (le, count) in thresholds.iter().zip(&state.buckets) {
                    let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
                }
                let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, state.count);
                let _ = writeln!(out, "{}_sum{} {}", name, braced(&label_str), state.sum);
                let _ = writeln!(out, "{}_count{} {}", name, braced(&label_str), state.count);
            }
        }
    }
}

/// Append a single unlabeled gauge; only the constant labels apply.
pub fn render_gauge(name: &str, value: f64, opts: &RenderOptions, out: &mut String) {
    let name = format!("{}{}", opts.prefix, name);
    let _ = writeln!(out, "# TYPE {} gauge", name);
    let _ = writeln!(out, "{}{} {}", name, braced(&label_pairs(&opts.const_labels)), value);
}

/// Render all metrics in the given order.
pub fn render(metrics: &[MetricSnapshot], opts: &RenderOptions, out: &mut String) {
    for metric in metrics {
        render_metric(metric, opts, out);
    }
}
