//! Realized gain accounting with strict FIFO matching.
//!
//! Keeps its own FIFO queue, separate from the inventory replay, and accumulates the gain of
//! every unit an execution closes. Matched units keep contributing to the total after they
//! leave the queue.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::portfolio::inventory::inventory_builder::apply_trade;
use crate::portfolio::inventory::{LotInventory, LotMatch};
use crate::portfolio::trade_grouping::group_by_security;
use crate::records::TradeExecution;

/// Incremental realized-gain accumulator for one security.
///
/// Feeding executions one at a time yields the same total as a from-scratch replay of the
/// same sequence.
#[derive(Debug, Clone, Default)]
pub struct RealizedGainCalculator {
    queue: LotInventory,
    realized_gain: Decimal,
}

impl RealizedGainCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one execution and returns the gain it realized.
    pub fn apply(&mut self, trade: &TradeExecution) -> Result<Decimal> {
        let matches = apply_trade(&mut self.queue, trade)?;
        let gain: Decimal = matches.iter().map(LotMatch::realized_gain).sum();
        self.realized_gain += gain;
        Ok(gain)
    }

    pub fn apply_all<'a, I>(&mut self, trades: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a TradeExecution>,
    {
        for trade in trades {
            self.apply(trade)?;
        }
        Ok(())
    }

    pub fn realized_gain(&self) -> Decimal {
        self.realized_gain
    }

    /// Open position left in the matching queue.
    pub fn open_quantity(&self) -> i64 {
        self.queue.quantity()
    }
}

/// Cumulative realized gain for one security. `trades` must be chronological.
pub fn calculate_realized_gain(trades: &[&TradeExecution]) -> Result<Decimal> {
    let mut calculator = RealizedGainCalculator::new();
    calculator.apply_all(trades.iter().copied())?;
    Ok(calculator.realized_gain())
}

/// Realized gain per security, for every security that has at least one execution.
pub fn calculate_realized_gains<'a, I>(trades: I) -> Result<BTreeMap<String, Decimal>>
where
    I: IntoIterator<Item = &'a TradeExecution>,
{
    group_by_security(trades)
        .into_iter()
        .map(|(sid, group)| calculate_realized_gain(&group).map(|gain| (sid, gain)))
        .collect()
}
