//! Shared application state for the exporter.
//!
//! Built once from config, then cloned into every handler. Startup errors are
//! returned, never panicked.

use std::sync::Arc;

use webprom_core::error::Result;
use webprom_core::exposition::{self, RenderOptions};
use webprom_core::LabelSet;

use crate::collector::{CollectorRegistry, WebCollector};
use crate::config::ExporterConfig;
use crate::obs::metrics::ExporterMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    collectors: Arc<CollectorRegistry>,
    metrics: Arc<ExporterMetrics>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    render: RenderOptions,
}

impl AppState {
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        cfg.validate()?;

        let collectors = CollectorRegistry::new();
        if cfg.web.enabled {
            collectors.register(Arc::new(WebCollector::from_config(&cfg.web)?));
        }

        let kinds = collectors.registered_kinds();
        if kinds.is_empty() {
            tracing::warn!("no collectors enabled; every record will be rejected");
        } else {
            tracing::info!(collectors = ?kinds, "collectors registered");
        }

        let render = RenderOptions {
            prefix: cfg.server.prefix.clone(),
            const_labels: LabelSet::new(cfg.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
        };

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, render }),
            collectors: Arc::new(collectors),
            metrics: Arc::new(ExporterMetrics::new()),
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn collectors(&self) -> Arc<CollectorRegistry> {
        Arc::clone(&self.collectors)
    }

    pub fn metrics(&self) -> Arc<ExporterMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    /// Full `/metrics` body: collectors first, then the exporter's own.
    pub fn render(&self) -> String {
        let opts = &self.inner.render;
        let mut out = String::new();
        exposition::render(&self.collectors.snapshot(), opts, &mut out);
        exposition::render(&self.metrics.snapshot(), opts, &mut out);
        self.metrics.render_draining(opts, &mut out);
        out
    }
}
