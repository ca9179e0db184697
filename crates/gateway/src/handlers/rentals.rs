//! Pass-through handlers for the reservation ledger.
//!
//! The admission decision happens entirely in the ledger; the gateway only
//! relays its verdicts, including error envelopes, untouched.

use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /rentals
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/rentals", state.upstream.rentals_url);
    let (status, body) = state.upstream.forward(Method::POST, url, Some(body)).await?;
    Ok((status, Json(body)))
}

/// GET /rentals
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let url = format!("{}/rentals", state.upstream.rentals_url);
    let (status, body) = state.upstream.forward(Method::GET, url, None).await?;
    Ok((status, Json(body)))
}

/// DELETE /rentals/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/rentals/{id}", state.upstream.rentals_url);
    let (status, body) = state.upstream.forward(Method::DELETE, url, None).await?;
    Ok((status, Json(body)))
}
