use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tradefolio_core::{
    portfolio::performance::{MarketPrices, PortfolioValuation},
    records::{Record, RecordSet},
    FullDerivedState,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValuationRequest {
    #[serde(default)]
    prices: MarketPrices,
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecomputeRequest {
    records: Vec<Record>,
    today: Option<NaiveDate>,
}

async fn get_derived(State(state): State<Arc<AppState>>) -> ApiResult<Json<FullDerivedState>> {
    let today = state.resolve_today(None)?;
    let mut engine = state.engine.lock().await;
    if engine.derived().as_of != today {
        tracing::info!("Valuation date rolled over to {}; refreshing", today);
        engine.refresh(today)?;
    }
    Ok(Json(engine.derived().clone()))
}

async fn value_portfolio(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ValuationRequest>>,
) -> ApiResult<Json<PortfolioValuation>> {
    let request = body.map(|Json(inner)| inner).unwrap_or_default();
    let today = state.resolve_today(request.today)?;
    let engine = state.engine.lock().await;
    let valuation = engine.value(&request.prices, today)?;
    if !valuation.missing_prices.is_empty() {
        tracing::warn!(
            "Valued {} securities at cost for lack of a price",
            valuation.missing_prices.len()
        );
    }
    Ok(Json(valuation))
}

/// Recomputes an arbitrary record set without touching the server's own records.
async fn recompute_records(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecomputeRequest>,
) -> ApiResult<Json<FullDerivedState>> {
    let records = RecordSet::from_records(request.records)?;
    let today = state.resolve_today(request.today)?;
    let derived = state.worker.submit(records, today).await?;
    Ok(Json(derived))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio/derived", get(get_derived))
        .route("/portfolio/valuation", post(value_portfolio))
        .route("/portfolio/recompute", post(recompute_records))
}
