//! Full recompute of derived state on every record change.

mod derived_state_model;
mod recompute_service;
mod recompute_worker;

pub use derived_state_model::FullDerivedState;
pub use recompute_service::{recompute, PortfolioEngine};
pub use recompute_worker::RecomputeWorker;
