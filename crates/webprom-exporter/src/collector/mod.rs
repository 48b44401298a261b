//! Type collectors and the registry that routes records to them.
//!
//! Every ingested record names its collector in a `"type"` field. The
//! registry keeps one collector per type and hands each record to it.

pub mod web;

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use webprom_core::error::{Result, WebPromError};
use webprom_core::MetricSnapshot;

pub use web::WebCollector;

/// A family of metrics fed by one record type.
pub trait TypeCollector: Send + Sync {
    /// Value of the record's `"type"` field this collector accepts.
    fn kind(&self) -> &'static str;
    fn collect(&self, record: &Value) -> Result<()>;
    /// Snapshot of every metric this collector owns, in registration order.
    fn metrics(&self) -> Vec<MetricSnapshot>;
}

/// Extract the `"type"` field of a record.
pub fn record_type(record: &Value) -> Result<&str> {
    let obj = record
        .as_object()
        .ok_or_else(|| WebPromError::BadRequest("record must be a JSON object".into()))?;
    obj.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| WebPromError::BadRequest("record is missing a string \"type\"".into()))
}

#[derive(Default)]
pub struct CollectorRegistry {
    collectors: DashMap<&'static str, Arc<dyn TypeCollector>>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self {
            collectors: DashMap::new(),
        }
    }

    pub fn register(&self, collector: Arc<dyn TypeCollector>) {
        self.collectors.insert(collector.kind(), collector);
    }

    /// Registered types, sorted.
    pub fn registered_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.collectors.iter().map(|e| *e.key()).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn TypeCollector>> {
        self.collectors.get(kind).map(|e| e.value().clone())
    }

    /// Route one record to the collector named by its type.
    pub fn collect(&self, record: &Value) -> Result<()> {
        let kind = record_type(record)?;
        let collector = self
            .get(kind)
            .ok_or_else(|| WebPromError::UnknownType(kind.to_string()))?;
        collector.collect(record)
    }

    /// All collectors' metrics, grouped by collector in sorted type order.
    pub fn snapshot(&self) -> Vec<MetricSnapshot> {
        self.registered_kinds()
            .into_iter()
            .filter_map(|kind| self.get(kind))
            .flat_map(|c| c.metrics())
            .collect()
    }
}
