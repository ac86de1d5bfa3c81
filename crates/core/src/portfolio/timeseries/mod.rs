pub mod timeseries_builder;
mod timeseries_model;

pub use timeseries_builder::{build_daily_series, weighted_average_cash_invested};
pub use timeseries_model::*;
