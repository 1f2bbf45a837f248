use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{error::ApiResult, main_lib::AppState};

async fn has_seed_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let seeded = state.seed_service.has_seed_data()?;
    Ok(Json(json!({ "hasData": seeded })))
}

async fn seed_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let inserted = state.seed_service.seed_data().await?;
    Ok(Json(json!({ "inserted": inserted })))
}

async fn clear_seed_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let deleted = state.seed_service.clear_seed_data().await?;
    Ok(Json(json!({ "deleted": deleted })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/seed",
        get(has_seed_data).post(seed_data).delete(clear_seed_data),
    )
}
