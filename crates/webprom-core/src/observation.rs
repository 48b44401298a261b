//! Typed web request record.
//!
//! Structural problems (a `timings` that is not an object, a label that is
//! not a scalar, a custom label name the exposition format cannot carry)
//! reject the whole record at decode time. A measurement that is present
//! but not a number decodes to `Measurement::Malformed` so the
//! router can skip just that sub-metric and still count the request.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, WebPromError};
use crate::labels::{is_label_name, LabelSet};

/// One request as reported by the web app. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebObservation {
    #[serde(default, deserialize_with = "label_value")]
    pub controller: Option<String>,
    #[serde(default, deserialize_with = "label_value")]
    pub action: Option<String>,
    /// HTTP status, numeric or string on the wire.
    #[serde(default, deserialize_with = "label_value")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "label_map")]
    pub custom_labels: Option<LabelSet>,
    #[serde(default)]
    pub timings: Option<Timings>,
    /// Seconds spent queued in front of the app (load balancer).
    #[serde(default)]
    pub queue_time: Option<Measurement>,
}

impl WebObservation {
    pub fn from_value(value: &Value) -> Result<Self> {
        WebObservation::deserialize(value)
            .map_err(|e| WebPromError::InvalidObservation(format!("malformed web record: {e}")))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timings {
    #[serde(default)]
    pub total_duration: Option<Measurement>,
    #[serde(default)]
    pub redis: Option<DatastoreTiming>,
    #[serde(default)]
    pub sql: Option<DatastoreTiming>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatastoreTiming {
    #[serde(default)]
    pub duration: Option<Measurement>,
}

/// A duration field as found on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Seconds(f64),
    /// Present but not numeric; carries the offending JSON.
    Malformed(String),
}

impl Measurement {
    /// Numeric value or `InvalidObservation` naming `field`.
    pub fn seconds(&self, field: &str) -> Result<f64> {
        match self {
            Measurement::Seconds(s) => Ok(*s),
            Measurement::Malformed(raw) => Err(WebPromError::InvalidObservation(format!(
                "{field}: expected seconds, got {raw}"
            ))),
        }
    }
}

impl From<f64> for Measurement {
    fn from(s: f64) -> Self {
        Measurement::Seconds(s)
    }
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(match v.as_f64() {
            Some(s) => Measurement::Seconds(s),
            None => Measurement::Malformed(v.to_string()),
        })
    }
}

fn scalar_label(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn label_value<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => scalar_label(&v)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("label value must be a scalar, got {v}"))),
    }
}

fn label_map<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<LabelSet>, D::Error> {
    let Some(map) = Option::<BTreeMap<String, Value>>::deserialize(d)? else {
        return Ok(None);
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (k, v) in map {
        if !is_label_name(&k) {
            return Err(D::Error::custom(format!(
                "custom label name {k:?} is not a valid label name"
            )));
        }
        let value = scalar_label(&v).ok_or_else(|| {
            D::Error::custom(format!("custom label {k:?} must be a scalar, got {v}"))
        })?;
        pairs.push((k, value));
    }
    Ok(Some(LabelSet::new(pairs)))
}
