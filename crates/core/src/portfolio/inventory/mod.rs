//! Lot inventory: FIFO open lots per security.

pub mod inventory_builder;
mod lots_model;

pub use inventory_builder::{build_inventories, build_inventory, replay_inventory};
pub use lots_model::*;
