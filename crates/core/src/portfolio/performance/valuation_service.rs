use chrono::NaiveDate;
use log::{debug, warn};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::cash_flows::build_cash_flows;
use super::performance_model::{MarketPrices, PortfolioValuation, SecurityValuation};
use super::xirr::solve_xirr;
use crate::errors::Result;
use crate::portfolio::recompute::FullDerivedState;
use crate::portfolio::rollup::SecuritySummary;
use crate::records::RecordSet;
use crate::settings::EngineSettings;

/// Combines cached derived state with current prices into market value, gains and returns.
///
/// Nothing here is cached: prices change far more often than records, so valuation is always
/// computed on demand. A held security without a price is valued at its cash invested, which
/// keeps its unrealized gain at zero instead of failing the whole valuation.
pub fn value_portfolio(
    derived: &FullDerivedState,
    records: &RecordSet,
    prices: &MarketPrices,
    today: NaiveDate,
    settings: &EngineSettings,
) -> Result<PortfolioValuation> {
    settings.validate()?;

    let mut securities = BTreeMap::new();
    let mut missing_prices = Vec::new();
    for (sid, summary) in &derived.securities {
        let price = prices.get(sid).copied();
        if price.is_none() && summary.is_held() {
            warn!(
                "No market price for {} (holding {}); valuing at cost",
                sid, summary.holding_quantity
            );
            missing_prices.push(sid.clone());
        }
        securities.insert(sid.clone(), value_security(summary, price));
    }

    let total_market_value: Decimal = securities.values().map(|s| s.market_value).sum();
    let total_unrealized_gain: Decimal = securities.values().map(|s| s.unrealized_gain).sum();
    let totals = &derived.totals;

    let total_return_amount = totals.total_realized_gain + total_unrealized_gain
        + totals.total_cash_dividend
        - totals.net_handling_fee;

    let flows = build_cash_flows(records, total_market_value, today);
    let xirr = solve_xirr(&flows, settings);
    let annualized_return = Decimal::from_f64(xirr.rate).unwrap_or(Decimal::ZERO);
    debug!(
        "Valued {} securities at {}: market value {}, XIRR {} via {:?}",
        securities.len(),
        today,
        total_market_value,
        xirr.rate,
        xirr.method
    );

    Ok(PortfolioValuation {
        valuation_date: today,
        securities,
        total_market_value,
        total_cash_invested: totals.total_cash_invested,
        total_unrealized_gain,
        total_realized_gain: totals.total_realized_gain,
        total_cash_dividend: totals.total_cash_dividend,
        net_handling_fee: totals.net_handling_fee,
        total_return_amount,
        simple_rate_of_return: ratio(total_return_amount, totals.total_cash_invested),
        time_weighted_rate_of_return: ratio(
            total_return_amount,
            derived.weighted_average_cash_invested,
        ),
        annualized_return,
        xirr,
        missing_prices,
    })
}

fn value_security(summary: &SecuritySummary, price: Option<Decimal>) -> SecurityValuation {
    let market_value = match price {
        Some(price) => price * Decimal::from(summary.holding_quantity),
        None => summary.cash_invested,
    };
    let unrealized_gain = market_value - summary.cash_invested;
    let gain = summary.realized_gain + unrealized_gain + summary.cash_dividend;

    SecurityValuation {
        sid: summary.sid.clone(),
        holding_quantity: summary.holding_quantity,
        market_price: price,
        market_value,
        cash_invested: summary.cash_invested,
        unrealized_gain,
        realized_gain: summary.realized_gain,
        cash_dividend: summary.cash_dividend,
        rate_of_return: ratio(gain, summary.cash_invested),
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::performance::XirrMethod;
    use crate::portfolio::recompute::recompute;
    use crate::records::{Record, TradeExecution};
    use rust_decimal_macros::dec;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    fn records() -> RecordSet {
        RecordSet::from_records(vec![
            Record::from(TradeExecution::new("b", "AAPL", day(1, 1), dec!(10), 100, dec!(0))),
            Record::from(TradeExecution::new("s", "AAPL", day(6, 1), dec!(15), -40, dec!(0))),
        ])
        .unwrap()
    }

    #[test]
    fn test_value_with_prices() {
        let records = records();
        let today = day(12, 31);
        let derived = recompute(&records, today).unwrap();
        let prices = MarketPrices::from([("AAPL".to_string(), dec!(20))]);

        let valuation =
            value_portfolio(&derived, &records, &prices, today, &EngineSettings::default())
                .unwrap();

        let aapl = &valuation.securities["AAPL"];
        assert_eq!(aapl.market_value, dec!(1200));
        assert_eq!(aapl.unrealized_gain, dec!(600));
        assert_eq!(aapl.realized_gain, dec!(200));
        assert_eq!(aapl.rate_of_return, dec!(800) / dec!(600));
        assert_eq!(valuation.total_return_amount, dec!(800));
        assert_eq!(valuation.simple_rate_of_return, dec!(800) / dec!(600));
        assert!(valuation.missing_prices.is_empty());
        assert!(valuation.xirr.converged());
        assert!(valuation.annualized_return > Decimal::ZERO);
    }

    #[test]
    fn test_missing_price_values_at_cost() {
        let records = records();
        let today = day(12, 31);
        let derived = recompute(&records, today).unwrap();

        let valuation = value_portfolio(
            &derived,
            &records,
            &MarketPrices::new(),
            today,
            &EngineSettings::default(),
        )
        .unwrap();

        let aapl = &valuation.securities["AAPL"];
        assert_eq!(aapl.market_price, None);
        assert_eq!(aapl.market_value, dec!(600));
        assert_eq!(aapl.unrealized_gain, dec!(0));
        assert_eq!(valuation.missing_prices, vec!["AAPL".to_string()]);
    }

    #[test]
    fn test_empty_portfolio_values_to_zero() {
        let records = RecordSet::new();
        let today = day(3, 1);
        let derived = recompute(&records, today).unwrap();

        let valuation = value_portfolio(
            &derived,
            &records,
            &MarketPrices::new(),
            today,
            &EngineSettings::default(),
        )
        .unwrap();

        assert_eq!(valuation.total_market_value, dec!(0));
        assert_eq!(valuation.simple_rate_of_return, dec!(0));
        assert_eq!(valuation.time_weighted_rate_of_return, dec!(0));
        assert_eq!(valuation.annualized_return, dec!(0));
        assert_eq!(valuation.xirr.method, XirrMethod::Degenerate);
    }

    #[test]
    fn test_portfolio_bought_today_has_zero_annualized_return() {
        let today = day(3, 1);
        let records = RecordSet::from_records(vec![Record::from(TradeExecution::new(
            "b",
            "AAPL",
            today,
            dec!(10),
            100,
            dec!(0),
        ))])
        .unwrap();
        let derived = recompute(&records, today).unwrap();
        let settings = EngineSettings::default();

        let mut priced = MarketPrices::new();
        priced.insert("AAPL".to_string(), dec!(11));

        for prices in [MarketPrices::new(), priced] {
            let valuation = value_portfolio(&derived, &records, &prices, today, &settings).unwrap();
            assert_eq!(valuation.annualized_return, dec!(0));
            assert_eq!(valuation.xirr.method, XirrMethod::Degenerate);
        }
    }
}
