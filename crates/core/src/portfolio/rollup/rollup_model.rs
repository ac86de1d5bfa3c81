use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived figures for one security.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySummary {
    pub sid: String,
    /// Signed units currently held (negative when short).
    pub holding_quantity: i64,
    /// Sum of signed open lot costs.
    pub cash_invested: Decimal,
    pub realized_gain: Decimal,
    pub handling_fee: Decimal,
    pub cash_dividend: Decimal,
    pub execution_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_deal_time: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_deal_time: Option<NaiveDate>,
}

impl SecuritySummary {
    pub fn is_held(&self) -> bool {
        self.holding_quantity != 0
    }
}

/// Portfolio-wide sums across securities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub total_cash_invested: Decimal,
    /// Sum of per-execution handling fees before discounts.
    pub total_handling_fee: Decimal,
    pub total_handling_fee_discount: Decimal,
    /// `total_handling_fee - total_handling_fee_discount`
    pub net_handling_fee: Decimal,
    pub total_realized_gain: Decimal,
    pub total_cash_dividend: Decimal,
}
