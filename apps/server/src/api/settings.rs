use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tradefolio_core::settings::{EngineSettings, EngineSettingsUpdate};

use crate::{error::ApiResult, main_lib::AppState};

async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<EngineSettings>> {
    Ok(Json(state.current_settings()?))
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EngineSettingsUpdate>,
) -> ApiResult<Json<EngineSettings>> {
    let mut engine = state.engine.lock().await;
    let updated = engine.update_settings(payload)?.clone();
    match state.settings.write() {
        Ok(mut settings) => *settings = updated.clone(),
        Err(_) => return Err(anyhow::anyhow!("settings lock poisoned").into()),
    }
    tracing::info!(
        "Engine settings updated (timezone {}, max iterations {})",
        updated.valuation_timezone,
        updated.xirr_max_iterations
    );
    Ok(Json(updated))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}
