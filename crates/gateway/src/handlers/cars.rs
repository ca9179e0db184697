//! Pass-through handlers for the fleet registry.

use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /cars
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let url = format!("{}/cars", state.upstream.cars_url);
    let (status, body) = state.upstream.forward(Method::GET, url, None).await?;
    Ok((status, Json(body)))
}

/// POST /cars
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/cars", state.upstream.cars_url);
    let (status, body) = state.upstream.forward(Method::POST, url, Some(body)).await?;
    Ok((status, Json(body)))
}

/// GET /cars/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/cars/{id}", state.upstream.cars_url);
    let (status, body) = state.upstream.forward(Method::GET, url, None).await?;
    Ok((status, Json(body)))
}

/// PUT /cars/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/cars/{id}", state.upstream.cars_url);
    let (status, body) = state.upstream.forward(Method::PUT, url, Some(body)).await?;
    Ok((status, Json(body)))
}

/// PUT /cars/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/cars/{id}/status", state.upstream.cars_url);
    let (status, body) = state.upstream.forward(Method::PUT, url, Some(body)).await?;
    Ok((status, Json(body)))
}

/// DELETE /cars/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/cars/{id}", state.upstream.cars_url);
    let (status, body) = state.upstream.forward(Method::DELETE, url, None).await?;
    Ok((status, Json(body)))
}
