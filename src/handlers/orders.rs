//! Persisted-order endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::ServiceError;
use crate::services::orders::OrderDetails;
use crate::services::reports::{OrderSummary, SalesFilter};
use crate::{ApiResponse, AppState};

#[derive(Serialize)]
pub struct SuggestedOrderNumber {
    pub order_number: String,
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ApiResponse<Vec<OrderSummary>>>, ServiceError> {
    let summaries = state.reports.overview(&filter).await?;
    Ok(Json(ApiResponse::success(summaries)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<ApiResponse<OrderDetails>>, ServiceError> {
    let details = state.orders.get_order(&order_number).await?;
    Ok(Json(ApiResponse::success(details)))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.orders.delete_order(&order_number).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn suggest_order_number(
    State(state): State<AppState>,
) -> Json<ApiResponse<SuggestedOrderNumber>> {
    Json(ApiResponse::success(SuggestedOrderNumber {
        order_number: state.orders.suggest_order_number(),
    }))
}
