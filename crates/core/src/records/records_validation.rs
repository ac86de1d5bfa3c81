//! Precondition checks on incoming records.
//!
//! The record source is trusted to hand over syntactically valid data, but a zero quantity or
//! a non-positive price would silently corrupt FIFO matching, so those fail fast.

use rust_decimal::Decimal;

use super::records_model::Record;
use crate::errors::{Result, ValidationError};

pub fn validate_record(record: &Record) -> Result<()> {
    match record {
        Record::Trade(trade) => {
            if trade.deal_quantity == 0 {
                return Err(ValidationError::ZeroQuantity {
                    id: trade.id.clone(),
                }
                .into());
            }
            if trade.deal_price <= Decimal::ZERO {
                return Err(ValidationError::NonPositivePrice {
                    id: trade.id.clone(),
                    price: trade.deal_price,
                }
                .into());
            }
            if trade.handling_fee < Decimal::ZERO {
                return Err(ValidationError::NegativeFee {
                    id: trade.id.clone(),
                    fee: trade.handling_fee,
                }
                .into());
            }
        }
        Record::Plan(plan) => {
            if plan.plan_quantity == 0 {
                return Err(ValidationError::ZeroQuantity {
                    id: plan.id.clone(),
                }
                .into());
            }
            if plan.plan_price <= Decimal::ZERO {
                return Err(ValidationError::NonPositivePrice {
                    id: plan.id.clone(),
                    price: plan.plan_price,
                }
                .into());
            }
        }
        Record::Discount(discount) => {
            if discount.amount < Decimal::ZERO {
                return Err(ValidationError::NegativeDiscount {
                    id: discount.id.clone(),
                    amount: discount.amount,
                }
                .into());
            }
        }
        // Dividends may carry any sign.
        Record::Dividend(_) => {}
    }

    if record.id().trim().is_empty() {
        return Err(ValidationError::InvalidInput(format!(
            "{} record is missing an id",
            record.kind()
        ))
        .into());
    }
    Ok(())
}

pub fn validate_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<()> {
    records.into_iter().try_for_each(validate_record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::records::{HandlingFeeDiscount, TradeExecution};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let record = Record::from(TradeExecution::new("t1", "AAPL", day(1), dec!(10), 0, dec!(0)));
        let err = validate_record(&record).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ZeroQuantity { ref id }) if id == "t1"
        ));
    }

    #[test]
    fn test_negative_price_and_fee_are_rejected() {
        let negative_price =
            Record::from(TradeExecution::new("t1", "AAPL", day(1), dec!(-1), 5, dec!(0)));
        assert!(matches!(
            validate_record(&negative_price),
            Err(Error::Validation(ValidationError::NonPositivePrice { .. }))
        ));

        let negative_fee =
            Record::from(TradeExecution::new("t2", "AAPL", day(1), dec!(1), 5, dec!(-0.5)));
        assert!(matches!(
            validate_record(&negative_fee),
            Err(Error::Validation(ValidationError::NegativeFee { .. }))
        ));
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let record = Record::from(TradeExecution::new("t1", "AAPL", day(1), dec!(0), 5, dec!(0)));
        assert!(matches!(
            validate_record(&record),
            Err(Error::Validation(ValidationError::NonPositivePrice { ref id, .. })) if id == "t1"
        ));
    }

    #[test]
    fn test_negative_discount_is_rejected() {
        let record = Record::from(HandlingFeeDiscount {
            id: "d1".to_string(),
            date: day(3),
            amount: dec!(-2),
            memo: String::new(),
        });
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn test_short_sell_without_prior_buy_is_valid() {
        let record = Record::from(TradeExecution::new("t1", "AAPL", day(1), dec!(10), -30, dec!(1)));
        assert!(validate_record(&record).is_ok());
    }
}
