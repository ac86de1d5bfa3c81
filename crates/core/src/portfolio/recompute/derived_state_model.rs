use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::portfolio::inventory::LotInventory;
use crate::portfolio::rollup::{PortfolioTotals, SecuritySummary};
use crate::portfolio::timeseries::DailyInvestment;

/// Everything derived from the record set, rebuilt from scratch on every change.
///
/// Holds no market prices. Maps are keyed by security id in a `BTreeMap`, so serializing the
/// same state always yields the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullDerivedState {
    pub as_of: NaiveDate,
    /// Open lots of every security with a non-zero position.
    pub inventories: BTreeMap<String, LotInventory>,
    /// One entry per security that has any execution or dividend.
    pub securities: BTreeMap<String, SecuritySummary>,
    pub totals: PortfolioTotals,
    pub daily_series: Vec<DailyInvestment>,
    pub weighted_average_cash_invested: Decimal,
}

impl FullDerivedState {
    pub fn empty(as_of: NaiveDate) -> Self {
        FullDerivedState {
            as_of,
            inventories: BTreeMap::new(),
            securities: BTreeMap::new(),
            totals: PortfolioTotals::default(),
            daily_series: Vec::new(),
            weighted_average_cash_invested: Decimal::ZERO,
        }
    }
}
