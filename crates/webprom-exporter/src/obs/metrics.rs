//! Self-metrics: how many records were accepted or rejected, per type, and
//! whether the process is draining.

use std::sync::atomic::{AtomicBool, Ordering};

use webprom_core::exposition::{self, RenderOptions};
use webprom_core::{Counter, LabelSet, Metric, MetricSnapshot};

pub struct ExporterMetrics {
    received: Counter,
    rejected: Counter,
    draining: AtomicBool,
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterMetrics {
    pub fn new() -> Self {
        Self {
            received: Counter::new(
                "collector_metrics_total",
                "Total metrics records received by the exporter.",
            ),
            rejected: Counter::new(
                "collector_bad_metrics_total",
                "Total mis-handled metrics records.",
            ),
            draining: AtomicBool::new(false),
        }
    }

    pub fn record_accepted(&self, kind: &str) {
        count(&self.received, kind);
    }

    pub fn record_rejected(&self, kind: &str) {
        count(&self.rejected, kind);
    }

    pub fn accepted(&self, kind: &str) -> u64 {
        self.received
            .get(&LabelSet::new([("type", kind)]))
            .unwrap_or(0.0) as u64
    }

    pub fn rejected(&self, kind: &str) -> u64 {
        self.rejected
            .get(&LabelSet::new([("type", kind)]))
            .unwrap_or(0.0) as u64
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Vec<MetricSnapshot> {
        vec![self.received.collect(), self.rejected.collect()]
    }

    /// Gauge line for the draining flag.
    pub fn render_draining(&self, opts: &RenderOptions, out: &mut String) {
        let value = if self.is_draining() { 1.0 } else { 0.0 };
        exposition::render_gauge("collector_draining", value, opts, out);
    }
}

// The self-metric counters are never strict, so an increment of 1 cannot fail.
fn count(counter: &Counter, kind: &str) {
    if let Err(e) = counter.increment(&LabelSet::new([("type", kind)])) {
        tracing::warn!(kind = %kind, error = %e, "self-metric update failed");
    }
}
