//! webprom exporter library entry.
//!
//! Wires config, collectors, ingest transport and the operational endpoints
//! into one HTTP service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod collector;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
