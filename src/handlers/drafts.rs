//! Draft-session endpoints: the order-building workflow over HTTP.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::drafts::{DraftLineItem, NewLineItem};
use crate::services::orders::{OrderHeader, OrderWorkflow, WorkflowMode};
use crate::{ApiResponse, AppState};

#[derive(Serialize)]
pub struct DraftSession {
    pub draft_id: Uuid,
}

#[derive(Serialize)]
pub struct DraftView {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing_order: Option<String>,
    pub items: Vec<DraftLineItem>,
    pub order_total: Decimal,
}

#[derive(Serialize)]
pub struct SubmitOutcome {
    pub order_number: String,
}

fn draft_view(workflow: &OrderWorkflow) -> DraftView {
    let (mode, editing_order) = match workflow.mode() {
        WorkflowMode::Creating => ("creating", None),
        WorkflowMode::Editing { order_number } => ("editing", Some(order_number.clone())),
    };
    DraftView {
        mode,
        editing_order,
        items: workflow.items().to_vec(),
        order_total: workflow.order_total(),
    }
}

pub async fn open_draft(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<DraftSession>>) {
    let draft_id = state.orders.open_session();
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(DraftSession { draft_id })),
    )
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DraftView>>, ServiceError> {
    let workflow = state.orders.workflow(id)?;
    let workflow = workflow.lock().await;
    Ok(Json(ApiResponse::success(draft_view(&workflow))))
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(item): Json<NewLineItem>,
) -> Result<Json<ApiResponse<DraftView>>, ServiceError> {
    let workflow = state.orders.workflow(id)?;
    let mut workflow = workflow.lock().await;
    workflow.add_item(item)?;
    Ok(Json(ApiResponse::success(draft_view(&workflow))))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, position)): Path<(Uuid, usize)>,
) -> Result<Json<ApiResponse<DraftView>>, ServiceError> {
    let workflow = state.orders.workflow(id)?;
    let mut workflow = workflow.lock().await;
    workflow.remove_item(position)?;
    Ok(Json(ApiResponse::success(draft_view(&workflow))))
}

pub async fn begin_edit(
    State(state): State<AppState>,
    Path((id, order_number)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<DraftView>>, ServiceError> {
    let workflow = state.orders.workflow(id)?;
    let mut workflow = workflow.lock().await;
    workflow.begin_edit(&order_number).await?;
    Ok(Json(ApiResponse::success(draft_view(&workflow))))
}

pub async fn submit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(header): Json<OrderHeader>,
) -> Result<Json<ApiResponse<SubmitOutcome>>, ServiceError> {
    let workflow = state.orders.workflow(id)?;
    let mut workflow = workflow.lock().await;
    let order_number = workflow.submit(header).await?;
    Ok(Json(ApiResponse::success(SubmitOutcome { order_number })))
}

/// Cancels the draft and closes the session.
pub async fn cancel_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    let workflow = state.orders.workflow(id)?;
    {
        let mut workflow = workflow.lock().await;
        workflow.cancel();
    }
    state.orders.close_session(id);
    Ok(Json(ApiResponse::success(())))
}
