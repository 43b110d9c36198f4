//! Wastage endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::entities::wastage;
use crate::errors::ServiceError;
use crate::services::wastage::NewWastageEntry;
use crate::{ApiResponse, AppState};

#[derive(Serialize)]
pub struct Recorded {
    pub id: i64,
}

pub async fn record(
    State(state): State<AppState>,
    Json(entry): Json<NewWastageEntry>,
) -> Result<(StatusCode, Json<ApiResponse<Recorded>>), ServiceError> {
    let id = state.wastage.record(entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Recorded { id })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<wastage::Model>>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.wastage.list().await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.wastage.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
