//! Day-by-day replay of all executions into the cash-invested and traded-notional curves.
//!
//! Replay runs per day across all securities, not per security, so every emitted row is a
//! consistent end-of-day snapshot of the whole portfolio.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::timeseries_model::DailyInvestment;
use crate::errors::Result;
use crate::portfolio::inventory::inventory_builder::apply_trade;
use crate::portfolio::inventory::LotInventory;
use crate::portfolio::trade_grouping::chronological;
use crate::records::TradeExecution;
use crate::utils::time_utils::get_days_between;

/// Builds one row per calendar day from the first execution through `today`.
///
/// Weekends and holidays are included. Days without executions repeat the previous day's
/// cash invested and report zero notional. Executions dated after `today` extend the series
/// to their date instead of being dropped.
pub fn build_daily_series<'a, I>(trades: I, today: NaiveDate) -> Result<Vec<DailyInvestment>>
where
    I: IntoIterator<Item = &'a TradeExecution>,
{
    let ordered = chronological(trades);
    let (Some(first), Some(last)) = (ordered.first(), ordered.last()) else {
        return Ok(Vec::new());
    };
    let start = first.deal_time;
    let end = today.max(last.deal_time);

    let mut trades_by_day: BTreeMap<NaiveDate, Vec<&TradeExecution>> = BTreeMap::new();
    for &trade in &ordered {
        trades_by_day.entry(trade.deal_time).or_default().push(trade);
    }

    let days = get_days_between(start, end);
    debug!(
        "Replaying {} executions over {} days ({} to {})",
        ordered.len(),
        days.len(),
        start,
        end
    );

    let mut inventories: HashMap<&str, LotInventory> = HashMap::new();
    let mut cash_invested = Decimal::ZERO;
    let mut series = Vec::with_capacity(days.len());

    for date in days {
        let mut traded_notional = Decimal::ZERO;
        if let Some(day_trades) = trades_by_day.get(&date) {
            for &trade in day_trades {
                let inventory = inventories.entry(trade.sid.as_str()).or_default();
                let before = inventory.cash_invested();
                apply_trade(inventory, trade)?;
                cash_invested += inventory.cash_invested() - before;
                traded_notional += trade.notional();
            }
        }
        series.push(DailyInvestment {
            date,
            total_cash_invested: cash_invested,
            total_traded_notional: traded_notional,
        });
    }

    Ok(series)
}

/// Recency-weighted average of the daily cash invested.
///
/// Day `i` (0-based) of `n` gets weight `i / (n(n-1)/2)`, so the weights sum to one and later
/// days count more. A single-day series returns that day's value; an empty one returns zero.
pub fn weighted_average_cash_invested(series: &[DailyInvestment]) -> Decimal {
    match series.len() {
        0 => Decimal::ZERO,
        1 => series[0].total_cash_invested,
        n => {
            let n = Decimal::from(n as u64);
            let denominator = n * (n - Decimal::ONE) / Decimal::TWO;
            let weighted: Decimal = series
                .iter()
                .enumerate()
                .map(|(i, point)| Decimal::from(i as u64) * point.total_cash_invested)
                .sum();
            weighted / denominator
        }
    }
}
