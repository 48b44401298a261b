//! Label-keyed metric accumulators.
//!
//! Each metric owns one `parking_lot::Mutex` around an insertion-ordered map
//! of `LabelSet -> state`. Every update and every snapshot of a metric runs
//! under that lock, so a snapshot never observes a half-applied histogram
//! update, and two metrics never contend with each other.

pub mod counter;
pub mod histogram;

use indexmap::IndexMap;

use crate::error::{Result, WebPromError};
use crate::labels::LabelSet;

pub use counter::Counter;
pub use histogram::{Histogram, HistogramState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Point-in-time copy of one metric, ready for exposition.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricSnapshot {
    Counter {
        name: String,
        help: String,
        series: Vec<(LabelSet, f64)>,
    },
    Histogram {
        name: String,
        help: String,
        /// Ascending upper bounds; the +Inf bucket is implied by `count`.
        thresholds: Vec<f64>,
        series: Vec<(LabelSet, HistogramState)>,
    },
}

impl MetricSnapshot {
    pub fn name(&self) -> &str {
        match self {
            MetricSnapshot::Counter { name, .. } | MetricSnapshot::Histogram { name, .. } => name,
        }
    }

    pub fn help(&self) -> &str {
        match self {
            MetricSnapshot::Counter { help, .. } | MetricSnapshot::Histogram { help, .. } => help,
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            MetricSnapshot::Counter { .. } => MetricKind::Counter,
            MetricSnapshot::Histogram { .. } => MetricKind::Histogram,
        }
    }

    /// Number of distinct time series.
    pub fn series_len(&self) -> usize {
        match self {
            MetricSnapshot::Counter { series, .. } => series.len(),
            MetricSnapshot::Histogram { series, .. } => series.len(),
        }
    }
}

/// Common surface of every accumulator type.
pub trait Metric: Send + Sync {
    fn name(&self) -> &str;
    fn help(&self) -> &str;
    fn kind(&self) -> MetricKind;
    /// Consistent copy of all series.
    fn collect(&self) -> MetricSnapshot;
}

/// Rejects negative and non-finite measurements.
pub(crate) fn check_value(metric: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(WebPromError::InvalidObservation(format!(
            "{metric}: value must be finite, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(WebPromError::InvalidObservation(format!(
            "{metric}: value must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// In strict mode the first series pins the metric's label names.
pub(crate) fn check_keys<V>(
    metric: &str,
    strict: bool,
    series: &IndexMap<LabelSet, V>,
    labels: &LabelSet,
) -> Result<()> {
    if !strict {
        return Ok(());
    }
    match series.first() {
        Some((pinned, _)) if !pinned.same_keys(labels) => {
            Err(WebPromError::InvalidObservation(format!(
                "{metric}: label names {:?} differ from {:?}",
                labels.keys().collect::<Vec<_>>(),
                pinned.keys().collect::<Vec<_>>(),
            )))
        }
        _ => Ok(()),
    }
}
