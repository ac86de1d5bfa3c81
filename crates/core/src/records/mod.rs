//! Records module - the event log the engine derives portfolio state from.

mod record_set;
mod records_model;
mod records_validation;

pub use record_set::*;
pub use records_model::*;
pub use records_validation::*;
