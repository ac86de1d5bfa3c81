//! Portfolio derivation: lots, realized gains, rollups, time series, returns and the
//! recompute that ties them together.

pub mod inventory;
pub mod performance;
pub mod realized;
pub mod recompute;
pub mod rollup;
pub mod timeseries;
pub mod trade_grouping;

pub use recompute::{recompute, FullDerivedState, PortfolioEngine, RecomputeWorker};
