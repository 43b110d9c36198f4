//! Product catalog endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::entities::product;
use crate::errors::ServiceError;
use crate::services::products::NewProduct;
use crate::{ApiResponse, AppState};

#[derive(Serialize)]
pub struct Created {
    pub id: i64,
}

pub async fn add(
    State(state): State<AppState>,
    Json(entry): Json<NewProduct>,
) -> Result<(StatusCode, Json<ApiResponse<Created>>), ServiceError> {
    let id = state.products.add(entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Created { id })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<product::Model>>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.products.list().await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.products.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
