//! Decode-once codec for ingest bodies.
//!
//! A body carries one JSON object or a stream of them, concatenated or
//! newline-delimited. The whole body is decoded before any record is applied,
//! so a truncated or garbled body changes nothing.

use serde_json::{Deserializer, Value};
use webprom_core::error::{Result, WebPromError};

pub fn decode(body: &str) -> Result<Vec<Value>> {
    let records = Deserializer::from_str(body)
        .into_iter::<Value>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| WebPromError::BadRequest(format!("invalid metrics json: {e}")))?;
    if records.is_empty() {
        return Err(WebPromError::BadRequest("empty metrics body".into()));
    }
    Ok(records)
}
