use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::error::Result;
use crate::labels::LabelSet;

use super::{check_keys, check_value, Metric, MetricKind, MetricSnapshot};

/// Monotonic counter, one value per label set.
pub struct Counter {
    name: String,
    help: String,
    strict_labels: bool,
    series: Mutex<IndexMap<LabelSet, f64>>,
}

impl Counter {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            strict_labels: false,
            series: Mutex::new(IndexMap::new()),
        }
    }

    /// Reject label sets whose names differ from the first series.
    pub fn with_strict_labels(mut self, strict: bool) -> Self {
        self.strict_labels = strict;
        self
    }

    /// Add `amount` to the series for `labels`, creating it at zero first.
    pub fn observe(&self, amount: f64, labels: &LabelSet) -> Result<()> {
        check_value(&self.name, amount)?;

        let mut series = self.series.lock();
        check_keys(&self.name, self.strict_labels, &*series, labels)?;
        *series.entry(labels.clone()).or_insert(0.0) += amount;
        Ok(())
    }

    /// Increment by 1.
    pub fn increment(&self, labels: &LabelSet) -> Result<()> {
        self.observe(1.0, labels)
    }

    pub fn get(&self, labels: &LabelSet) -> Option<f64> {
        self.series.lock().get(labels).copied()
    }

    /// Drop one series; returns its last value.
    pub fn remove(&self, labels: &LabelSet) -> Option<f64> {
        self.series.lock().shift_remove(labels)
    }

    /// Drop every series.
    pub fn reset(&self) {
        self.series.lock().clear();
    }

    /// Series in first-observed order.
    pub fn snapshot(&self) -> Vec<(LabelSet, f64)> {
        self.series
            .lock()
            .iter()
            .map(|(labels, value)| (labels.clone(), *value))
            .collect()
    }
}

impl Metric for Counter {
    fn name(&self) -> &str {
        &self.name
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Counter
    }

    fn collect(&self) -> MetricSnapshot {
        MetricSnapshot::Counter {
            name: self.name.clone(),
            help: self.help.clone(),
            series: self.snapshot(),
        }
    }
}
