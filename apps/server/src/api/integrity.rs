use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tradebook_core::integrity::IntegrityResult;

use crate::{error::ApiResult, main_lib::AppState};

/// Runs a fresh integrity check.
async fn check_integrity(State(state): State<Arc<AppState>>) -> ApiResult<Json<IntegrityResult>> {
    Ok(Json(state.integrity_service.check_integrity()))
}

async fn get_corruption(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.integrity_service.check_for_corrupted_data()))
}

async fn repair(State(state): State<Arc<AppState>>) -> ApiResult<(StatusCode, Json<Value>)> {
    let success = state.integrity_service.repair_data_corruption().await;
    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(json!({ "success": success }))))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/integrity", get(check_integrity))
        .route("/integrity/corruption", get(get_corruption))
        .route("/integrity/repair", post(repair))
}
