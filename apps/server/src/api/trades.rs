use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tradebook_core::{MutationResult, NewTrade, Trade, ValidationResult};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TradesQuery {
    symbol: Option<String>,
    as_of: Option<NaiveDate>,
}

/// Status for a mutation outcome: rejected by validation, or failed to persist.
fn mutation_status(result: &MutationResult, success: StatusCode) -> StatusCode {
    if result.success {
        success
    } else if result
        .validation
        .as_ref()
        .is_some_and(|validation| !validation.is_valid)
    {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn list_trades(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TradesQuery>,
) -> ApiResult<Json<Vec<Trade>>> {
    let trades = match (q.symbol.as_deref(), q.as_of) {
        (Some(symbol), Some(as_of)) => state
            .trade_service
            .get_trades_up_to(as_of)
            .into_iter()
            .filter(|t| t.matches_symbol(symbol))
            .collect(),
        (Some(symbol), None) => state.trade_service.get_trades_by_symbol(symbol),
        (None, Some(as_of)) => state.trade_service.get_trades_up_to(as_of),
        (None, None) => state.trade_service.get_all_trades(),
    };
    Ok(Json(trades))
}

async fn get_trade(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Trade>> {
    state
        .trade_service
        .get_trade(id)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn validate_trade(
    State(state): State<Arc<AppState>>,
    Json(trade): Json<NewTrade>,
) -> ApiResult<Json<ValidationResult>> {
    Ok(Json(state.trade_service.validate_trade(&trade)))
}

async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(trade): Json<NewTrade>,
) -> ApiResult<(StatusCode, Json<MutationResult>)> {
    let result = state.trade_service.submit_trade(trade).await;
    Ok((mutation_status(&result, StatusCode::CREATED), Json(result)))
}

async fn replace_trade(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(trade): Json<NewTrade>,
) -> ApiResult<(StatusCode, Json<MutationResult>)> {
    if state.trade_service.get_trade(id).is_none() {
        return Err(ApiError::NotFound);
    }
    let result = state.trade_service.submit_replacement(id, trade).await;
    Ok((mutation_status(&result, StatusCode::OK), Json(result)))
}

async fn delete_trade(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<MutationResult>)> {
    if state.trade_service.get_trade(id).is_none() {
        return Err(ApiError::NotFound);
    }
    let result = if state.trade_service.delete_trade(id).await {
        MutationResult::persisted(None)
    } else {
        MutationResult::failed(None)
    };
    Ok((mutation_status(&result, StatusCode::OK), Json(result)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trades", get(list_trades).post(create_trade))
        .route("/trades/validate", post(validate_trade))
        .route(
            "/trades/{id}",
            get(get_trade).put(replace_trade).delete(delete_trade),
        )
}
