//! Goods-receipt endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::ServiceError;
use crate::services::stock_in::{NewStockInEntry, StockInRecord};
use crate::{ApiResponse, AppState};

#[derive(Serialize)]
pub struct Recorded {
    pub id: i64,
}

pub async fn record(
    State(state): State<AppState>,
    Json(entry): Json<NewStockInEntry>,
) -> Result<(StatusCode, Json<ApiResponse<Recorded>>), ServiceError> {
    let id = state.stock_in.record(entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Recorded { id })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StockInRecord>>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.stock_in.list().await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.stock_in.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
