//! Cumulative-bucket histogram.
//!
//! Thresholds are sorted ascending once at construction and shared by every
//! series. An observation lands in every bucket whose upper bound is at or
//! above the value, i.e. a suffix of the ascending bucket list, so bucket
//! counts never decrease with the threshold. Values above the largest bound
//! only move `sum` and `count` (the implicit +Inf bucket).

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::error::{Result, WebPromError};
use crate::labels::LabelSet;

use super::{check_keys, check_value, Metric, MetricKind, MetricSnapshot};

/// Accumulated state of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramState {
    pub sum: f64,
    pub count: u64,
    /// Cumulative counts, aligned with the ascending thresholds.
    pub buckets: Vec<u64>,
}

impl HistogramState {
    fn new(buckets: usize) -> Self {
        Self {
            sum: 0.0,
            count: 0,
            buckets: vec![0; buckets],
        }
    }
}

pub struct Histogram {
    name: String,
    help: String,
    thresholds: Vec<f64>,
    strict_labels: bool,
    series: Mutex<IndexMap<LabelSet, HistogramState>>,
}

impl Histogram {
    /// Thresholds may come in any order; duplicates collapse. Non-finite
    /// thresholds are rejected (+Inf is always implied).
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        thresholds: impl IntoIterator<Item = f64>,
    ) -> Result<Self> {
        let name = name.into();
        let mut thresholds: Vec<f64> = thresholds.into_iter().collect();
        if let Some(bad) = thresholds.iter().find(|t| !t.is_finite()) {
            return Err(WebPromError::BadRequest(format!(
                "{name}: bucket threshold must be finite, got {bad}"
            )));
        }
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();

        Ok(Self {
            name,
            help: help.into(),
            thresholds,
            strict_labels: false,
            series: Mutex::new(IndexMap::new()),
        })
    }

    /// Reject label sets whose names differ from the first series.
    pub fn with_strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }

    /// Ascending bucket upper bounds.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Record one measurement. Sum, count and buckets move together under the
    /// metric lock.
    pub fn observe(&self, value: f64, labels: &LabelSet) -> Result<()> {
        check_value(&self.name, value)?;
        // First bucket whose bound is >= value; everything after it too.
        let first = self.thresholds.partition_point(|t| *t < value);

        let mut series = self.series.lock();
        check_keys(&self.name, self.strict_labels, &*series, labels)?;
        let state = series
            .entry(labels.clone())
            .or_insert_with(|| HistogramState::new(self.thresholds.len()));

        state.count += 1;
        state.sum += value;
        for bucket in &mut state.buckets[first..] {
            *bucket += 1;
        }
        Ok(())
    }

    pub fn get(&self, labels: &LabelSet) -> Option<HistogramState> {
        self.series.lock().get(labels).cloned()
    }

    /// Drop one series; returns its last state.
    pub fn remove(&self, labels: &LabelSet) -> Option<HistogramState> {
        self.series.lock().shift_remove(labels)
    }

    /// Drop every series.
    pub fn reset(&self) {
        self.series.lock().clear();
    }

    /// Series in first-observed order.
    pub fn snapshot(&self) -> Vec<(LabelSet, HistogramState)> {
        self.series
            .lock()
            .iter()
            .map(|(labels, state)| (labels.clone(), state.clone()))
            .collect()
    }
}

impl Metric for Histogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Histogram
    }

    fn collect(&self) -> MetricSnapshot {
        MetricSnapshot::Histogram {
            name: self.name.clone(),
            help: self.help.clone(),
            thresholds: self.thresholds.clone(),
            series: self.snapshot(),
        }
    }
}
