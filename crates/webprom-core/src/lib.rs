//! webprom core: label sets, metric accumulators, the typed web record and
//! the text exposition format.
//!
//! This crate carries no transport or runtime dependencies so the aggregation
//! engine can be embedded or tested without the HTTP exporter.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed
//! measurements surface as `WebPromError::InvalidObservation` and leave
//! accumulator state untouched.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod labels;
pub mod metric;
pub mod observation;

/// Shared result type.
pub use error::{ErrorCode, Result, WebPromError};
pub use labels::LabelSet;
pub use metric::{Counter, Histogram, HistogramState, Metric, MetricKind, MetricSnapshot};
