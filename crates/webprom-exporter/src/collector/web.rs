//! Web request collector.
//!
//! Owns the five request metrics. They are created on the first record and
//! live as long as the collector; `OnceCell` makes that exactly-once even when
//! many ingest tasks race on the first record.

use once_cell::sync::OnceCell;
use serde_json::Value;

use webprom_core::error::{Result, WebPromError};
use webprom_core::observation::{Measurement, WebObservation};
use webprom_core::{Counter, Histogram, LabelSet, Metric, MetricSnapshot};

use super::TypeCollector;
use crate::config::WebSection;

/// Request duration buckets in seconds, largest first.
pub const DURATION_BUCKETS: [f64; 16] = [
    90.0, 60.0, 45.0, 30.0, 15.0, 10.0, 5.0, 2.5, 1.0, 0.5, 0.25, 0.1, 0.05, 0.025, 0.01, 0.005,
];

/// Label value used when the record does not name a controller or action.
pub const OTHER: &str = "other";

struct WebMetrics {
    requests: Counter,
    duration: Histogram,
    redis_duration: Histogram,
    sql_duration: Histogram,
    queue_duration: Histogram,
}

impl WebMetrics {
    fn new(buckets: &[f64], strict: bool) -> Result<Self> {
        let histogram = |name: &str, help: &str| {
            Histogram::new(name, help, buckets.iter().copied())
                .map(|h| h.with_strict_labels(strict))
        };
        Ok(Self {
            requests: Counter::new("http_requests_total", "Total HTTP requests from web app.")
                .with_strict_labels(strict),
            duration: histogram(
                "http_duration_seconds",
                "Time spent in HTTP reqs in seconds.",
            )?,
            redis_duration: histogram(
                "http_redis_duration_seconds",
                "Time spent in HTTP reqs in Redis, in seconds.",
            )?,
            sql_duration: histogram(
                "http_sql_duration_seconds",
                "Time spent in HTTP reqs in SQL in seconds.",
            )?,
            queue_duration: histogram(
                "http_queue_duration_seconds",
                "Time spent queueing the request in load balancer in seconds.",
            )?,
        })
    }

    fn collect(&self) -> Vec<MetricSnapshot> {
        vec![
            self.requests.collect(),
            self.duration.collect(),
            self.redis_duration.collect(),
            self.sql_duration.collect(),
            self.queue_duration.collect(),
        ]
    }
}

pub struct WebCollector {
    buckets: Vec<f64>,
    strict_labels: bool,
    metrics: OnceCell<WebMetrics>,
}

impl Default for WebCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl WebCollector {
    pub fn new() -> Self {
        Self {
            buckets: DURATION_BUCKETS.to_vec(),
            strict_labels: false,
            metrics: OnceCell::new(),
        }
    }

    pub fn from_config(cfg: &WebSection) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            buckets: cfg
                .buckets
                .clone()
                .unwrap_or_else(|| DURATION_BUCKETS.to_vec()),
            strict_labels: cfg.strict_label_keys,
            metrics: OnceCell::new(),
        })
    }

    /// True once the first record has created the metrics.
    pub fn is_active(&self) -> bool {
        self.metrics.get().is_some()
    }

    fn ensure_metrics(&self) -> Result<&WebMetrics> {
        self.metrics.get_or_try_init(|| {
            let metrics = WebMetrics::new(&self.buckets, self.strict_labels)?;
            tracing::debug!(buckets = self.buckets.len(), "web metrics registered");
            Ok(metrics)
        })
    }

    /// Apply one request to the metrics.
    ///
    /// The request counter and every well-formed duration are recorded even
    /// when some other duration is malformed; the malformed ones are reported
    /// together in a single `InvalidObservation`.
    pub fn observe(&self, obs: &WebObservation) -> Result<()> {
        let m = self.ensure_metrics()?;
        let labels = request_labels(obs);
        let mut rejected: Vec<String> = Vec::new();

        let status = obs.status.clone().unwrap_or_default();
        if let Err(e) = m.requests.increment(&labels.with("status", status)) {
            rejected.push(reason(e));
        }

        let mut record = |hist: &Histogram, field: &str, value: &Measurement| {
            if let Err(e) = value
                .seconds(field)
                .and_then(|seconds| hist.observe(seconds, &labels))
            {
                rejected.push(reason(e));
            }
        };

        if let Some(timings) = &obs.timings {
            if let Some(total) = &timings.total_duration {
                record(&m.duration, "timings.total_duration", total);
            }
            if let Some(redis) = timings.redis.as_ref().and_then(|r| r.duration.as_ref()) {
                record(&m.redis_duration, "timings.redis.duration", redis);
            }
            if let Some(sql) = timings.sql.as_ref().and_then(|s| s.duration.as_ref()) {
                record(&m.sql_duration, "timings.sql.duration", sql);
            }
        }
        if let Some(queue_time) = &obs.queue_time {
            record(&m.queue_duration, "queue_time", queue_time);
        }

        if rejected.is_empty() {
            Ok(())
        } else {
            Err(WebPromError::InvalidObservation(rejected.join("; ")))
        }
    }

    /// Metrics in registration order; empty until the first record.
    pub fn snapshot(&self) -> Vec<MetricSnapshot> {
        self.metrics.get().map(WebMetrics::collect).unwrap_or_default()
    }
}

impl TypeCollector for WebCollector {
    fn kind(&self) -> &'static str {
        "web"
    }

    fn collect(&self, record: &Value) -> Result<()> {
        self.ensure_metrics()?;
        let obs = WebObservation::from_value(record)?;
        self.observe(&obs)
    }

    fn metrics(&self) -> Vec<MetricSnapshot> {
        self.snapshot()
    }
}

/// `{controller, action}` with custom labels layered on top.
pub fn request_labels(obs: &WebObservation) -> LabelSet {
    let defaults = LabelSet::new([
        ("controller", obs.controller.as_deref().unwrap_or(OTHER)),
        ("action", obs.action.as_deref().unwrap_or(OTHER)),
    ]);
    match &obs.custom_labels {
        Some(custom) => defaults.merge(custom),
        None => defaults,
    }
}

fn reason(e: WebPromError) -> String {
    match e {
        WebPromError::InvalidObservation(msg) => msg,
        other => other.to_string(),
    }
}
