use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::Deserialize;
use webprom_core::error::{Result, WebPromError};
use webprom_core::labels::is_label_name;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    /// Constant labels attached to every exported series.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub web: WebSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            labels: BTreeMap::new(),
            web: WebSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WebPromError::UnsupportedVersion);
        }
        for name in self.labels.keys() {
            if !is_label_name(name) {
                return Err(WebPromError::BadRequest(format!(
                    "labels: invalid label name {name:?}"
                )));
            }
        }

        self.server.validate()?;
        self.web.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Prepended to every exported metric name.
    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            prefix: String::new(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<SocketAddr>().is_err() {
            return Err(WebPromError::BadRequest(format!(
                "server.listen must be a valid SocketAddr, got {:?}",
                self.listen
            )));
        }
        if !self.prefix.is_empty() && !is_metric_name(&self.prefix) {
            return Err(WebPromError::BadRequest(format!(
                "server.prefix {:?} is not a valid metric name prefix",
                self.prefix
            )));
        }
        if !(1024..=64 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(WebPromError::BadRequest(
                "server.max_body_bytes must be between 1024 and 67108864".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:9394".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Overrides the default duration buckets (seconds, any order).
    #[serde(default)]
    pub buckets: Option<Vec<f64>>,

    #[serde(default)]
    pub strict_label_keys: bool,
}

impl Default for WebSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            buckets: None,
            strict_label_keys: false,
        }
    }
}

impl WebSection {
    pub fn validate(&self) -> Result<()> {
        let Some(buckets) = &self.buckets else {
            return Ok(());
        };
        if buckets.is_empty() {
            return Err(WebPromError::BadRequest(
                "web.buckets must not be empty".into(),
            ));
        }
        if buckets.iter().any(|b| !b.is_finite() || *b < 0.0) {
            return Err(WebPromError::BadRequest(
                "web.buckets must be finite and non-negative".into(),
            ));
        }
        let mut sorted = buckets.clone();
        sorted.sort_by(f64::total_cmp);
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(WebPromError::BadRequest(
                "web.buckets must not contain duplicates".into(),
            ));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn is_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
