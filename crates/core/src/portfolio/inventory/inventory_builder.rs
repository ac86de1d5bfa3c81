//! Lot inventory replay.
//!
//! Replays the executions of one security in chronological order and yields the open lots
//! that remain.

use log::debug;
use std::collections::BTreeMap;

use super::lots_model::{LotInventory, LotMatch};
use crate::errors::{CalculatorError, Error, Result};
use crate::portfolio::trade_grouping::group_by_security;
use crate::records::TradeExecution;

/// Final inventory after replaying `trades`, which must already be in chronological order.
pub fn build_inventory(trades: &[&TradeExecution]) -> Result<LotInventory> {
    let mut inventory = LotInventory::new();
    for trade in trades {
        apply_trade(&mut inventory, trade)?;
    }
    Ok(inventory)
}

/// Inventory after each prefix of `trades`. Element `i` is the state once `trades[i]` applied.
pub fn replay_inventory(trades: &[&TradeExecution]) -> Result<Vec<LotInventory>> {
    let mut inventory = LotInventory::new();
    let mut snapshots = Vec::with_capacity(trades.len());
    for trade in trades {
        apply_trade(&mut inventory, trade)?;
        snapshots.push(inventory.clone());
    }
    Ok(snapshots)
}

/// Per-security inventories. Securities whose inventory ends empty are omitted.
pub fn build_inventories<'a, I>(trades: I) -> Result<BTreeMap<String, LotInventory>>
where
    I: IntoIterator<Item = &'a TradeExecution>,
{
    let mut inventories = BTreeMap::new();
    for (sid, group) in group_by_security(trades) {
        let inventory = build_inventory(&group)?;
        if inventory.is_empty() {
            debug!("Security {} is flat after {} executions", sid, group.len());
            continue;
        }
        inventories.insert(sid, inventory);
    }
    Ok(inventories)
}

pub(crate) fn apply_trade(
    inventory: &mut LotInventory,
    trade: &TradeExecution,
) -> Result<Vec<LotMatch>> {
    inventory
        .apply(trade.deal_quantity, trade.deal_price)
        .map_err(|e| match e {
            Error::Calculation(CalculatorError::InvalidActivity(msg)) => {
                CalculatorError::InvalidActivity(format!("{} (execution {})", msg, trade.id)).into()
            }
            other => other,
        })
}
