pub mod aggregate_rollup;
mod rollup_model;

pub use aggregate_rollup::{
    rollup_totals, summarize_security, total_discount, total_handling_fee, SecurityRollup,
};
pub use rollup_model::*;
