use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tradefolio_core::{
    errors::Error as CoreError,
    records::{Record, RecordKind, RecordMutation},
    FullDerivedState,
};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_records(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Record>>> {
    let engine = state.engine.lock().await;
    Ok(Json(engine.records().records().to_vec()))
}

async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(record): Json<Record>,
) -> ApiResult<Json<FullDerivedState>> {
    apply_mutation(&state, RecordMutation::Create { record }).await
}

async fn update_record(
    State(state): State<Arc<AppState>>,
    Json(record): Json<Record>,
) -> ApiResult<Json<FullDerivedState>> {
    apply_mutation(&state, RecordMutation::Update { record }).await
}

async fn delete_record(
    Path((kind, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<FullDerivedState>> {
    let kind: RecordKind = kind.parse().map_err(CoreError::from)?;
    apply_mutation(&state, RecordMutation::Delete { kind, id }).await
}

async fn bulk_mutate(
    State(state): State<Arc<AppState>>,
    Json(mutations): Json<Vec<RecordMutation>>,
) -> ApiResult<Json<FullDerivedState>> {
    apply_mutation(&state, RecordMutation::Bulk { mutations }).await
}

async fn apply_mutation(
    state: &AppState,
    mutation: RecordMutation,
) -> ApiResult<Json<FullDerivedState>> {
    let today = state.resolve_today(None)?;
    let mut engine = state.engine.lock().await;
    let derived = engine.mutate(mutation, today)?.clone();
    tracing::debug!("Record log now holds {} records", engine.records().len());
    Ok(Json(derived))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/records",
            get(list_records).post(create_record).put(update_record),
        )
        .route("/records/bulk", post(bulk_mutate))
        .route("/records/{kind}/{id}", delete(delete_record))
}
