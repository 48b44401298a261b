//! Ingest transport.
//!
//! - `codec`: HTTP body -> JSON records (decode-once, all or nothing)
//! - `http`: `POST /send-metrics` handler routing records to collectors

pub mod codec;
pub mod http;
