//! Health check handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.store.healthy().await;

    Json(json!({
        "status": if store_healthy { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "store_healthy": store_healthy,
    }))
}
