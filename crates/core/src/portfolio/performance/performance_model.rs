use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::xirr::XirrSolution;

/// A dated signed cash flow: negative is money invested, positive is money returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Current reference price per security id, supplied by the market-price source.
pub type MarketPrices = HashMap<String, Decimal>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityValuation {
    pub sid: String,
    pub holding_quantity: i64,
    /// `None` when no price was supplied; the holding is then valued at its cash invested.
    pub market_price: Option<Decimal>,
    pub market_value: Decimal,
    pub cash_invested: Decimal,
    pub unrealized_gain: Decimal,
    pub realized_gain: Decimal,
    pub cash_dividend: Decimal,
    /// `(realized + unrealized + dividends) / cash invested`, zero when nothing is invested.
    pub rate_of_return: Decimal,
}

/// Derived state recombined with market prices at display time. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub valuation_date: NaiveDate,
    pub securities: BTreeMap<String, SecurityValuation>,
    pub total_market_value: Decimal,
    pub total_cash_invested: Decimal,
    pub total_unrealized_gain: Decimal,
    pub total_realized_gain: Decimal,
    pub total_cash_dividend: Decimal,
    pub net_handling_fee: Decimal,
    /// `realized + unrealized + dividends - net handling fee`
    pub total_return_amount: Decimal,
    /// Total return over current cash invested.
    pub simple_rate_of_return: Decimal,
    /// Total return over the recency-weighted average cash invested.
    pub time_weighted_rate_of_return: Decimal,
    pub annualized_return: Decimal,
    pub xirr: XirrSolution,
    /// Securities held but without a supplied price.
    pub missing_prices: Vec<String>,
}
