use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness plus a cheap datastore round trip.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let datastore = match state.store.fetch_products().await {
        Ok(_) => "ok",
        Err(_) => "unreachable",
    };
    Json(json!({
        "status": if datastore == "ok" { "ok" } else { "degraded" },
        "datastore": datastore,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
