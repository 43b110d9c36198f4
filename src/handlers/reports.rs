//! Aggregate reporting endpoints. Each one aggregates a fresh snapshot;
//! nothing is cached between requests.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::ServiceError;
use crate::services::reports::{
    CustomerSales, ExpirationSlice, MonthlySales, ProductSales, SalesFilter, SalesStats,
    WeekdaySales,
};
use crate::{ApiResponse, AppState};

pub async fn stats(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ApiResponse<SalesStats>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.reports.stats(&filter).await?,
    )))
}

pub async fn by_product(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ApiResponse<Vec<ProductSales>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.reports.by_product(&filter).await?,
    )))
}

pub async fn by_customer(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ApiResponse<Vec<CustomerSales>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.reports.by_customer(&filter).await?,
    )))
}

pub async fn monthly(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ApiResponse<Vec<MonthlySales>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.reports.monthly(&filter).await?,
    )))
}

pub async fn weekday(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ApiResponse<Vec<WeekdaySales>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.reports.weekday(&filter).await?,
    )))
}

pub async fn expiration(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExpirationSlice>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.reports.expiration().await?,
    )))
}
