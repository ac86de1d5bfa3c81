//! Tradefolio Core - portfolio derivation engine.
//!
//! Derives lot inventories, realized gains, aggregate rollups, daily investment series and
//! money-weighted returns from a log of trade, dividend and fee-discount records. Every
//! derived figure is recomputed from the full record set; nothing is patched incrementally.
//! The crate does no I/O and knows nothing about storage or transport.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod records;
pub mod settings;
pub mod utils;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
