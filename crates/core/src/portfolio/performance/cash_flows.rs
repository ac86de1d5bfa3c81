//! Dated cash flows feeding the XIRR solver.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::performance_model::CashFlow;
use crate::records::RecordSet;

/// Builds the money-weighted cash flows of the whole record log.
///
/// - each execution: `-price * quantity` on its deal date (outflow for buys, inflow for sells)
/// - each execution's handling fee: `-fee` on its deal date
/// - each cash dividend: `+cash_dividend` on its date
/// - each handling fee discount: `+amount` on its date
/// - terminal: `+terminal_value` on `today`, the value if everything were liquidated today
///
/// Fees and discounts are dated individually, so the terminal flow carries no fee netting.
/// Zero-amount flows are dropped. Output is sorted by date, stable on input order.
pub fn build_cash_flows(
    records: &RecordSet,
    terminal_value: Decimal,
    today: NaiveDate,
) -> Vec<CashFlow> {
    let mut flows = Vec::new();

    for trade in records.trades() {
        flows.push(CashFlow {
            date: trade.deal_time,
            amount: trade.cash_flow(),
        });
        flows.push(CashFlow {
            date: trade.deal_time,
            amount: -trade.handling_fee,
        });
    }
    for dividend in records.dividends() {
        flows.push(CashFlow {
            date: dividend.deal_time,
            amount: dividend.cash_dividend,
        });
    }
    for discount in records.discounts() {
        flows.push(CashFlow {
            date: discount.date,
            amount: discount.amount,
        });
    }
    flows.push(CashFlow {
        date: today,
        amount: terminal_value,
    });

    flows.retain(|cf| !cf.amount.is_zero());
    flows.sort_by_key(|cf| cf.date);
    flows
}
