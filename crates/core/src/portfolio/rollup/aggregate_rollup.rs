//! Per-security reduction and portfolio totals.
//!
//! Each security is reduced on its own from its own executions; totals are plain sums of the
//! per-security results, so nothing computed for one security feeds into another.

use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::rollup_model::{PortfolioTotals, SecuritySummary};
use crate::errors::Result;
use crate::portfolio::inventory::{build_inventory, LotInventory};
use crate::portfolio::realized::calculate_realized_gain;
use crate::records::{CashDividendEvent, HandlingFeeDiscount, TradeExecution};

/// Summary and open lots of one security.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRollup {
    pub summary: SecuritySummary,
    pub inventory: LotInventory,
}

/// Reduces one security. `trades` must be chronological and all belong to `sid`.
pub fn summarize_security(
    sid: &str,
    trades: &[&TradeExecution],
    dividends: &[&CashDividendEvent],
) -> Result<SecurityRollup> {
    let inventory = build_inventory(trades)?;
    let realized_gain = calculate_realized_gain(trades)?;

    let summary = SecuritySummary {
        sid: sid.to_string(),
        holding_quantity: inventory.quantity(),
        cash_invested: inventory.cash_invested(),
        realized_gain,
        handling_fee: total_handling_fee(trades.iter().copied()),
        cash_dividend: dividends.iter().map(|d| d.cash_dividend).sum(),
        execution_count: trades.len(),
        first_deal_time: trades.first().map(|t| t.deal_time),
        last_deal_time: trades.last().map(|t| t.deal_time),
    };
    debug!(
        "Security {}: {} executions, holding {}, realized {}",
        sid, summary.execution_count, summary.holding_quantity, summary.realized_gain
    );

    Ok(SecurityRollup { summary, inventory })
}

pub fn total_handling_fee<'a, I>(trades: I) -> Decimal
where
    I: IntoIterator<Item = &'a TradeExecution>,
{
    trades.into_iter().map(|t| t.handling_fee).sum()
}

pub fn total_discount<'a, I>(discounts: I) -> Decimal
where
    I: IntoIterator<Item = &'a HandlingFeeDiscount>,
{
    discounts.into_iter().map(|d| d.amount).sum()
}

/// Sums per-security summaries into portfolio totals and nets discounts off the fees.
pub fn rollup_totals<'a, I>(
    summaries: &BTreeMap<String, SecuritySummary>,
    discounts: I,
) -> PortfolioTotals
where
    I: IntoIterator<Item = &'a HandlingFeeDiscount>,
{
    let mut totals = PortfolioTotals::default();
    for summary in summaries.values() {
        totals.total_cash_invested += summary.cash_invested;
        totals.total_handling_fee += summary.handling_fee;
        totals.total_realized_gain += summary.realized_gain;
        totals.total_cash_dividend += summary.cash_dividend;
    }
    totals.total_handling_fee_discount = total_discount(discounts);
    totals.net_handling_fee = totals.total_handling_fee - totals.total_handling_fee_discount;
    totals
}
