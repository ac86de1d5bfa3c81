use chrono::NaiveDate;
use log::{debug, error};
use std::collections::BTreeMap;

use super::derived_state_model::FullDerivedState;
use crate::errors::Result;
use crate::portfolio::performance::{value_portfolio, MarketPrices, PortfolioValuation};
use crate::portfolio::rollup::{rollup_totals, summarize_security};
use crate::portfolio::timeseries::{build_daily_series, weighted_average_cash_invested};
use crate::portfolio::trade_grouping::group_by_security;
use crate::records::{validate_records, CashDividendEvent, RecordMutation, RecordSet};
use crate::settings::{EngineSettings, EngineSettingsUpdate};

/// Rebuilds every derived structure from the complete record set.
///
/// Preconditions are checked for all records before any computation, so an invalid record
/// fails the whole call rather than producing partial figures. Plans are ignored.
pub fn recompute(records: &RecordSet, today: NaiveDate) -> Result<FullDerivedState> {
    validate_records(records.records())?;
    debug!("Recomputing derived state from {} records", records.len());

    let trades_by_security = group_by_security(records.trades());
    let mut dividends_by_security: BTreeMap<String, Vec<&CashDividendEvent>> = BTreeMap::new();
    for dividend in records.dividends() {
        dividends_by_security
            .entry(dividend.sid.clone())
            .or_default()
            .push(dividend);
    }

    let mut sids: Vec<&String> = trades_by_security
        .keys()
        .chain(dividends_by_security.keys())
        .collect();
    sids.sort();
    sids.dedup();

    let mut state = FullDerivedState::empty(today);
    for sid in sids {
        let trades = trades_by_security.get(sid).map(Vec::as_slice).unwrap_or(&[]);
        let dividends = dividends_by_security
            .get(sid)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let rollup = summarize_security(sid, trades, dividends)?;
        if !rollup.inventory.is_empty() {
            state.inventories.insert(sid.clone(), rollup.inventory);
        }
        state.securities.insert(sid.clone(), rollup.summary);
    }

    state.totals = rollup_totals(&state.securities, records.discounts());
    state.daily_series = build_daily_series(records.trades(), today)?;
    state.weighted_average_cash_invested = weighted_average_cash_invested(&state.daily_series);

    debug!(
        "Recompute finished: {} securities, {} held, {} series days",
        state.securities.len(),
        state.inventories.len(),
        state.daily_series.len()
    );
    Ok(state)
}

/// Owns the authoritative record list and keeps derived state in step with it.
///
/// Every mutation triggers a full recompute. If the recompute fails, the record list is
/// restored so the engine never holds records it cannot derive.
#[derive(Debug, Clone)]
pub struct PortfolioEngine {
    records: RecordSet,
    settings: EngineSettings,
    derived: FullDerivedState,
}

impl PortfolioEngine {
    pub fn new(records: RecordSet, settings: EngineSettings, today: NaiveDate) -> Result<Self> {
        settings.validate()?;
        let derived = recompute(&records, today)?;
        Ok(PortfolioEngine {
            records,
            settings,
            derived,
        })
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn derived(&self) -> &FullDerivedState {
        &self.derived
    }

    pub fn mutate(
        &mut self,
        mutation: RecordMutation,
        today: NaiveDate,
    ) -> Result<&FullDerivedState> {
        let previous = self.records.clone();
        self.records.apply(mutation)?;

        match recompute(&self.records, today) {
            Ok(derived) => {
                self.derived = derived;
                Ok(&self.derived)
            }
            Err(e) => {
                error!("Recompute failed, restoring previous records: {}", e);
                self.records = previous;
                Err(e)
            }
        }
    }

    /// Recomputes against a new `today` without changing records, e.g. after midnight.
    pub fn refresh(&mut self, today: NaiveDate) -> Result<&FullDerivedState> {
        self.derived = recompute(&self.records, today)?;
        Ok(&self.derived)
    }

    /// Values the portfolio as of `today`. A date other than the cached one is served from a
    /// one-off recompute; the cached derived state is left as it is.
    pub fn value(&self, prices: &MarketPrices, today: NaiveDate) -> Result<PortfolioValuation> {
        if self.derived.as_of == today {
            return value_portfolio(&self.derived, &self.records, prices, today, &self.settings);
        }
        debug!("Valuing as of {} from a one-off recompute", today);
        let derived = recompute(&self.records, today)?;
        value_portfolio(&derived, &self.records, prices, today, &self.settings)
    }

    /// Applies a partial settings update. Invalid results leave the current settings in place.
    pub fn update_settings(&mut self, update: EngineSettingsUpdate) -> Result<&EngineSettings> {
        self.settings = self.settings.apply_update(update)?;
        Ok(&self.settings)
    }
}
