//! `POST /send-metrics`.
//!
//! Records are routed independently: a bad record is logged and counted, the
//! rest of the batch still applies.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use webprom_core::error::{Result, WebPromError};

use crate::app_state::AppState;
use crate::collector::record_type;
use crate::transport::codec::decode;

/// Self-metric label for records without a registered collector.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Outcome of one ingest call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Decode `body` and hand every record to its collector.
pub fn ingest(state: &AppState, body: &str) -> Result<IngestSummary> {
    let records = decode(body)?;
    let collectors = state.collectors();
    let metrics = state.metrics();
    let mut summary = IngestSummary::default();

    for record in &records {
        // Only registered types become label values.
        let kind = match record_type(record) {
            Ok(kind) if collectors.get(kind).is_some() => kind,
            _ => UNKNOWN_TYPE,
        };
        match collectors.collect(record) {
            Ok(()) => {
                summary.accepted += 1;
                metrics.record_accepted(kind);
            }
            Err(e) => {
                summary.rejected += 1;
                metrics.record_rejected(kind);
                tracing::warn!(kind = %kind, code = e.code().as_str(), error = %e, "metrics record rejected");
            }
        }
    }
    tracing::debug!(accepted = summary.accepted, rejected = summary.rejected, "ingest batch applied");
    Ok(summary)
}

pub async fn send_metrics(State(state): State<AppState>, body: String) -> Response {
    match ingest(&state, &body) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &WebPromError) -> Response {
    tracing::warn!(code = e.code().as_str(), error = %e, "metrics body rejected");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": e.code().as_str(),
            "message": e.to_string(),
        })),
    )
        .into_response()
}
