use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradebook_core::PortfolioHolding;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsOfQuery {
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuantityResponse {
    symbol: String,
    quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    as_of: Option<NaiveDate>,
}

async fn get_holdings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AsOfQuery>,
) -> ApiResult<Json<Vec<PortfolioHolding>>> {
    Ok(Json(state.holdings_service.get_holdings(q.as_of)))
}

async fn get_quantity(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<AsOfQuery>,
) -> ApiResult<Json<QuantityResponse>> {
    let quantity = state.holdings_service.get_quantity(&symbol, q.as_of);
    Ok(Json(QuantityResponse {
        symbol: symbol.to_uppercase(),
        quantity,
        as_of: q.as_of,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holdings", get(get_holdings))
        .route("/holdings/{symbol}/quantity", get(get_quantity))
}
