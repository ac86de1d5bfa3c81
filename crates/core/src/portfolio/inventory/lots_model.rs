use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::errors::{CalculatorError, Result};

/// Units of one security opened together at the same unit cost.
///
/// `quantity` is signed: positive for a long lot, negative for a short lot. For a short lot
/// `cost` is the price the short was opened at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub quantity: i64,
    pub cost: Decimal,
}

impl Lot {
    /// Signed acquisition cost of the lot.
    pub fn cash_invested(&self) -> Decimal {
        self.cost * Decimal::from(self.quantity)
    }
}

/// Units matched between an open lot and a closing execution.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LotMatch {
    /// Signed closing quantity: negative when a sell closes a long lot, positive when a buy
    /// covers a short lot.
    pub quantity: i64,
    pub open_cost: Decimal,
    pub close_price: Decimal,
}

impl LotMatch {
    /// `(close_price - open_cost) * -quantity`
    pub fn realized_gain(&self) -> Decimal {
        (self.close_price - self.open_cost) * Decimal::from(-self.quantity)
    }
}

/// Open lots of one security, oldest first.
///
/// All lots share one sign. An execution of the same sign appends a lot; an execution of the
/// opposite sign consumes lots from the front and, if it outsizes the inventory, opens a new
/// lot of its own sign for the excess.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct LotInventory {
    lots: VecDeque<Lot>,
}

impl LotInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lots(&self) -> &VecDeque<Lot> {
        &self.lots
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Signed number of units held.
    pub fn quantity(&self) -> i64 {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }

    /// Sum of signed lot costs.
    pub fn cash_invested(&self) -> Decimal {
        self.lots.iter().map(Lot::cash_invested).sum()
    }

    /// -1 for a short inventory, 1 for a long one, 0 when flat.
    pub fn sign(&self) -> i64 {
        self.lots.front().map_or(0, |lot| lot.quantity.signum())
    }

    /// Applies one execution and returns the units it closed, in FIFO order.
    pub fn apply(&mut self, quantity: i64, price: Decimal) -> Result<Vec<LotMatch>> {
        if quantity == 0 {
            return Err(CalculatorError::InvalidActivity(
                "Execution quantity must not be zero".to_string(),
            )
            .into());
        }

        if self.sign() == 0 || self.sign() == quantity.signum() {
            self.lots.push_back(Lot {
                quantity,
                cost: price,
            });
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        let mut remaining = quantity;
        while remaining != 0 {
            let Some(front) = self.lots.front_mut() else {
                break;
            };
            let take = remaining.abs().min(front.quantity.abs());
            let matched = take * remaining.signum();

            matches.push(LotMatch {
                quantity: matched,
                open_cost: front.cost,
                close_price: price,
            });

            front.quantity += matched;
            remaining -= matched;
            if front.quantity == 0 {
                self.lots.pop_front();
            }
        }

        if remaining != 0 {
            warn!(
                "Execution of {} @ {} flipped the inventory; opening {} @ {}",
                quantity, price, remaining, price
            );
            self.lots.push_back(Lot {
                quantity: remaining,
                cost: price,
            });
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_same_sign_appends_lots() {
        let mut inventory = LotInventory::new();
        assert!(inventory.apply(10, dec!(10)).unwrap().is_empty());
        assert!(inventory.apply(5, dec!(12)).unwrap().is_empty());

        assert_eq!(inventory.lots().len(), 2);
        assert_eq!(inventory.quantity(), 15);
        assert_eq!(inventory.cash_invested(), dec!(160));
    }

    #[test]
    fn test_partial_close_shrinks_front_lot_only() {
        let mut inventory = LotInventory::new();
        inventory.apply(100, dec!(10)).unwrap();
        let matches = inventory.apply(-40, dec!(15)).unwrap();

        assert_eq!(
            matches,
            vec![LotMatch {
                quantity: -40,
                open_cost: dec!(10),
                close_price: dec!(15)
            }]
        );
        assert_eq!(matches[0].realized_gain(), dec!(200));
        assert_eq!(
            inventory.lots().front(),
            Some(&Lot {
                quantity: 60,
                cost: dec!(10)
            })
        );
    }

    #[test]
    fn test_close_spans_multiple_lots_oldest_first() {
        let mut inventory = LotInventory::new();
        inventory.apply(10, dec!(10)).unwrap();
        inventory.apply(10, dec!(20)).unwrap();
        let matches = inventory.apply(-15, dec!(30)).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].quantity, -10);
        assert_eq!(matches[0].open_cost, dec!(10));
        assert_eq!(matches[1].quantity, -5);
        assert_eq!(matches[1].open_cost, dec!(20));
        assert_eq!(inventory.quantity(), 5);
        assert_eq!(inventory.cash_invested(), dec!(100));
    }

    #[test]
    fn test_oversized_sell_flips_to_short() {
        let mut inventory = LotInventory::new();
        inventory.apply(50, dec!(10)).unwrap();
        let matches = inventory.apply(-80, dec!(12)).unwrap();

        let realized: Decimal = matches.iter().map(LotMatch::realized_gain).sum();
        assert_eq!(realized, dec!(100));
        assert_eq!(inventory.sign(), -1);
        assert_eq!(
            inventory.lots().iter().copied().collect::<Vec<_>>(),
            vec![Lot {
                quantity: -30,
                cost: dec!(12)
            }]
        );
        assert_eq!(inventory.cash_invested(), dec!(-360));
    }

    #[test]
    fn test_covering_short_realizes_gain() {
        let mut inventory = LotInventory::new();
        inventory.apply(-30, dec!(12)).unwrap();
        let matches = inventory.apply(30, dec!(8)).unwrap();

        assert_eq!(matches[0].realized_gain(), dec!(120));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut inventory = LotInventory::new();
        assert!(inventory.apply(0, dec!(1)).is_err());
    }
}
