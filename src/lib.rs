//! Stockbook API Library
//!
//! Inventory and sales tracking for small retailers: stock receipts, sales
//! orders built up from draft line items, wastage, a product catalog, and
//! aggregate reporting over all of it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod datastore;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;

use crate::datastore::Datastore;
use crate::events::EventSender;
use crate::services::{
    orders::OrderService, products::ProductService, reports::ReportService,
    stock_in::StockInService, wastage::WastageService,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<dyn Datastore>,
    pub event_sender: EventSender,
    pub orders: OrderService,
    pub stock_in: StockInService,
    pub wastage: WastageService,
    pub products: ProductService,
    pub reports: ReportService,
}

impl AppState {
    pub fn new(
        config: config::AppConfig,
        store: Arc<dyn Datastore>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            orders: OrderService::new(store.clone(), event_sender.clone()),
            stock_in: StockInService::new(store.clone(), event_sender.clone()),
            wastage: WastageService::new(store.clone(), event_sender.clone()),
            products: ProductService::new(store.clone(), event_sender.clone()),
            reports: ReportService::new(store.clone()),
            config,
            store,
            event_sender,
        }
    }
}

// Common response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }
}

/// All `/api/v1` routes.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Draft order workflow
        .route("/drafts", post(handlers::drafts::open_draft))
        .route(
            "/drafts/:id",
            get(handlers::drafts::get_draft).delete(handlers::drafts::cancel_draft),
        )
        .route("/drafts/:id/items", post(handlers::drafts::add_item))
        .route(
            "/drafts/:id/items/:position",
            delete(handlers::drafts::remove_item),
        )
        .route(
            "/drafts/:id/edit/:order_number",
            post(handlers::drafts::begin_edit),
        )
        .route("/drafts/:id/submit", post(handlers::drafts::submit_draft))
        // Persisted orders
        .route("/orders", get(handlers::orders::list_orders))
        .route(
            "/orders/suggest-number",
            get(handlers::orders::suggest_order_number),
        )
        .route(
            "/orders/:order_number",
            get(handlers::orders::get_order).delete(handlers::orders::delete_order),
        )
        // Stock receipts
        .route(
            "/stock-in",
            get(handlers::stock_in::list).post(handlers::stock_in::record),
        )
        .route("/stock-in/:id", delete(handlers::stock_in::delete))
        // Wastage
        .route(
            "/wastage",
            get(handlers::wastage::list).post(handlers::wastage::record),
        )
        .route("/wastage/:id", delete(handlers::wastage::delete))
        // Catalog
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::add),
        )
        .route("/products/:id", delete(handlers::products::delete))
        // Reports
        .route("/reports/stats", get(handlers::reports::stats))
        .route("/reports/products", get(handlers::reports::by_product))
        .route("/reports/customers", get(handlers::reports::by_customer))
        .route("/reports/monthly", get(handlers::reports::monthly))
        .route("/reports/weekday", get(handlers::reports::weekday))
        .route("/reports/expiration", get(handlers::reports::expiration))
}
