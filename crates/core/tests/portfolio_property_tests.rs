//! Property-based integration tests for the portfolio derivation engine.
//!
//! These tests check invariants that must hold for any execution history,
//! using the `proptest` crate for random test case generation.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use tradefolio_core::portfolio::inventory::replay_inventory;
use tradefolio_core::portfolio::realized::{calculate_realized_gain, RealizedGainCalculator};
use tradefolio_core::portfolio::timeseries::build_daily_series;
use tradefolio_core::portfolio::trade_grouping::chronological;
use tradefolio_core::records::{Record, RecordSet, TradeExecution};
use tradefolio_core::recompute;

// =============================================================================
// Generators
// =============================================================================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Generates a non-zero signed quantity.
fn arb_quantity() -> impl Strategy<Value = i64> {
    prop_oneof![-500i64..=-1, 1i64..=500]
}

/// Generates executions for one security, in creation order.
fn arb_trades(sid: &'static str, max_count: usize) -> impl Strategy<Value = Vec<TradeExecution>> {
    proptest::collection::vec(
        (0i64..40, 1i64..100_000, arb_quantity(), 0i64..500),
        0..=max_count,
    )
    .prop_map(move |rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (offset, cents, qty, fee_cents))| {
                TradeExecution::new(
                    format!("{}-{}", sid, i),
                    sid,
                    base_date() + Duration::days(offset),
                    Decimal::new(cents, 2),
                    qty,
                    Decimal::new(fee_cents, 2),
                )
            })
            .collect()
    })
}

/// Generates a record set spanning a few securities.
fn arb_record_set() -> impl Strategy<Value = RecordSet> {
    (arb_trades("A", 15), arb_trades("B", 15), arb_trades("C", 5)).prop_map(|(a, b, c)| {
        let mut records: Vec<Record> = Vec::new();
        // Interleave securities so creation order mixes them.
        let mut iters = [a.into_iter(), b.into_iter(), c.into_iter()];
        loop {
            let mut any = false;
            for it in iters.iter_mut() {
                if let Some(trade) = it.next() {
                    records.push(Record::from(trade));
                    any = true;
                }
            }
            if !any {
                break;
            }
        }
        RecordSet::from_records(records).unwrap()
    })
}

fn today() -> NaiveDate {
    base_date() + Duration::days(45)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Remaining lot quantity equals the running sum of signed quantities at every prefix.
    #[test]
    fn prop_inventory_size_matches_running_sum(trades in arb_trades("A", 30)) {
        let ordered = chronological(&trades);
        let snapshots = replay_inventory(&ordered).unwrap();

        let mut running = 0i64;
        for (trade, inventory) in ordered.iter().zip(&snapshots) {
            running += trade.deal_quantity;
            prop_assert_eq!(inventory.quantity(), running);
            prop_assert!(inventory.lots().iter().all(|lot| lot.quantity != 0));
            prop_assert!(inventory
                .lots()
                .iter()
                .all(|lot| lot.quantity.signum() == running.signum()));
        }
    }

    /// Realized gain accumulated in two halves equals a single full replay.
    #[test]
    fn prop_realized_gain_is_replayable(trades in arb_trades("A", 30), split in 0usize..=30) {
        let ordered = chronological(&trades);
        let split = split.min(ordered.len());

        let mut calculator = RealizedGainCalculator::new();
        calculator.apply_all(ordered[..split].iter().copied()).unwrap();
        calculator.apply_all(ordered[split..].iter().copied()).unwrap();

        let mut step_sum = Decimal::ZERO;
        let mut stepwise = RealizedGainCalculator::new();
        for trade in &ordered {
            step_sum += stepwise.apply(trade).unwrap();
        }

        let full = calculate_realized_gain(&ordered).unwrap();
        prop_assert_eq!(calculator.realized_gain(), full);
        prop_assert_eq!(step_sum, full);
    }

    /// Recomputing an identical record set yields identical state, down to serialized bytes.
    #[test]
    fn prop_recompute_is_bit_identical(records in arb_record_set()) {
        let first = recompute(&records, today()).unwrap();
        let second = recompute(&records, today()).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    /// Pre-sorting the log with a stable date sort does not change any derived figure.
    #[test]
    fn prop_stable_resort_keeps_same_day_order(records in arb_record_set()) {
        let mut sorted: Vec<Record> = records.records().to_vec();
        sorted.sort_by_key(|record| record.date());
        let resorted = RecordSet::from_records(sorted).unwrap();

        prop_assert_eq!(
            recompute(&records, today()).unwrap(),
            recompute(&resorted, today()).unwrap()
        );
    }

    /// One row per calendar day. Cash invested is constant on days without executions, never
    /// falls on a day with only buys and never rises on a day with only sells.
    #[test]
    fn prop_daily_series_is_continuous(records in arb_record_set()) {
        let trades: Vec<&TradeExecution> = records.trades().collect();
        let series = build_daily_series(trades.iter().copied(), today()).unwrap();

        let Some(first) = trades.iter().map(|t| t.deal_time).min() else {
            prop_assert!(series.is_empty());
            return Ok(());
        };
        let expected_days = (today() - first).num_days() + 1;
        prop_assert_eq!(series.len() as i64, expected_days);
        prop_assert_eq!(series[0].date, first);
        prop_assert_eq!(series[series.len() - 1].date, today());

        let trade_days: HashSet<NaiveDate> = trades.iter().map(|t| t.deal_time).collect();
        let buy_days: HashSet<NaiveDate> = trades
            .iter()
            .filter(|t| t.deal_quantity > 0)
            .map(|t| t.deal_time)
            .collect();
        let sell_days: HashSet<NaiveDate> = trades
            .iter()
            .filter(|t| t.deal_quantity < 0)
            .map(|t| t.deal_time)
            .collect();

        for pair in series.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            prop_assert_eq!(cur.date - prev.date, Duration::days(1));
            if !trade_days.contains(&cur.date) {
                prop_assert_eq!(cur.total_cash_invested, prev.total_cash_invested);
                prop_assert_eq!(cur.total_traded_notional, Decimal::ZERO);
            }
            let buys = buy_days.contains(&cur.date);
            let sells = sell_days.contains(&cur.date);
            if buys && !sells {
                prop_assert!(cur.total_cash_invested >= prev.total_cash_invested);
            }
            if sells && !buys {
                prop_assert!(cur.total_cash_invested <= prev.total_cash_invested);
            }
        }
    }
}
