//! Record domain models.
//!
//! Records are immutable facts supplied by the record source. Every derived figure in the
//! engine is recomputed from these.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// A buy (positive quantity) or sell (negative quantity) execution of one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeExecution {
    pub id: String,
    /// Security id
    pub sid: String,
    pub deal_time: NaiveDate,
    pub deal_price: Decimal,
    /// Signed, never zero
    pub deal_quantity: i64,
    #[serde(default)]
    pub handling_fee: Decimal,
}

impl TradeExecution {
    pub fn new(
        id: impl Into<String>,
        sid: impl Into<String>,
        deal_time: NaiveDate,
        deal_price: Decimal,
        deal_quantity: i64,
        handling_fee: Decimal,
    ) -> Self {
        TradeExecution {
            id: id.into(),
            sid: sid.into(),
            deal_time,
            deal_price,
            deal_quantity,
            handling_fee,
        }
    }

    /// Traded notional, `price * |quantity|`.
    pub fn notional(&self) -> Decimal {
        self.deal_price * Decimal::from(self.deal_quantity.unsigned_abs())
    }

    /// Cash effect of the execution itself (excluding fees): negative for buys.
    pub fn cash_flow(&self) -> Decimal {
        -(self.deal_price * Decimal::from(self.deal_quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashDividendEvent {
    pub id: String,
    pub sid: String,
    pub deal_time: NaiveDate,
    pub cash_dividend: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlingFeeDiscount {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub memo: String,
}

/// An intended trade the user has not executed yet. Never contributes to derived state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePlan {
    pub id: String,
    pub sid: String,
    pub plan_time: NaiveDate,
    pub plan_price: Decimal,
    pub plan_quantity: i64,
    #[serde(default)]
    pub memo: String,
}

/// Discriminant for [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Trade,
    Dividend,
    Plan,
    Discount,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Trade => "trade",
            RecordKind::Dividend => "dividend",
            RecordKind::Plan => "plan",
            RecordKind::Discount => "discount",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trade" => Ok(RecordKind::Trade),
            "dividend" => Ok(RecordKind::Dividend),
            "plan" => Ok(RecordKind::Plan),
            "discount" => Ok(RecordKind::Discount),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown record kind '{}'",
                other
            ))),
        }
    }
}

/// Any record held in the authoritative log, tagged with an explicit `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Trade(TradeExecution),
    Dividend(CashDividendEvent),
    Plan(TradePlan),
    Discount(HandlingFeeDiscount),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Trade(_) => RecordKind::Trade,
            Record::Dividend(_) => RecordKind::Dividend,
            Record::Plan(_) => RecordKind::Plan,
            Record::Discount(_) => RecordKind::Discount,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Trade(r) => &r.id,
            Record::Dividend(r) => &r.id,
            Record::Plan(r) => &r.id,
            Record::Discount(r) => &r.id,
        }
    }

    /// Security id, if the record belongs to one.
    pub fn sid(&self) -> Option<&str> {
        match self {
            Record::Trade(r) => Some(&r.sid),
            Record::Dividend(r) => Some(&r.sid),
            Record::Plan(r) => Some(&r.sid),
            Record::Discount(_) => None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Record::Trade(r) => r.deal_time,
            Record::Dividend(r) => r.deal_time,
            Record::Plan(r) => r.plan_time,
            Record::Discount(r) => r.date,
        }
    }

    pub fn as_trade(&self) -> Option<&TradeExecution> {
        match self {
            Record::Trade(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_dividend(&self) -> Option<&CashDividendEvent> {
        match self {
            Record::Dividend(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_discount(&self) -> Option<&HandlingFeeDiscount> {
        match self {
            Record::Discount(r) => Some(r),
            _ => None,
        }
    }
}

impl From<TradeExecution> for Record {
    fn from(value: TradeExecution) -> Self {
        Record::Trade(value)
    }
}

impl From<CashDividendEvent> for Record {
    fn from(value: CashDividendEvent) -> Self {
        Record::Dividend(value)
    }
}

impl From<TradePlan> for Record {
    fn from(value: TradePlan) -> Self {
        Record::Plan(value)
    }
}

impl From<HandlingFeeDiscount> for Record {
    fn from(value: HandlingFeeDiscount) -> Self {
        Record::Discount(value)
    }
}
