use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calendar day of the cash-invested and traded-notional curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyInvestment {
    pub date: NaiveDate,
    /// Portfolio-wide sum of open lot costs at the end of the day.
    pub total_cash_invested: Decimal,
    /// `sum(price * |quantity|)` over that day's executions.
    pub total_traded_notional: Decimal,
}
