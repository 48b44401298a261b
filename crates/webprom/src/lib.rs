//! Top-level facade crate for webprom.
//!
//! Re-exports the aggregation core and the exporter service so users can depend on a single crate.

pub mod core {
    pub use webprom_core::*;
}

pub mod exporter {
    pub use webprom_exporter::*;
}
