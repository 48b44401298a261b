//! The exporter's own metrics.
//!
//! Built on the same core `Counter` as the collectors and rendered after them
//! by the `/metrics` handler.

pub mod metrics;
