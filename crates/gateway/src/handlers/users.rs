//! Pass-through handlers for the user directory, plus session bookkeeping.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Lifetime of a gateway login session.
const SESSION_TTL: Duration = Duration::from_secs(3600);

fn session_key(user_id: i64) -> String {
    format!("gateway:user:{user_id}:session")
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/register", state.upstream.users_url);
    let (status, body) = state.upstream.forward(Method::POST, url, Some(body)).await?;
    Ok((status, Json(body)))
}

/// POST /users/login
///
/// On a successful login, store a short-lived session entry for the user.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/login", state.upstream.users_url);
    let (status, body) = state.upstream.forward(Method::POST, url, Some(body)).await?;

    if status.is_success() {
        if let Some(user_id) = body.get("user_id").and_then(Value::as_i64) {
            if let Err(e) = state
                .cache
                .set_with_ttl(&session_key(user_id), "active", SESSION_TTL)
                .await
            {
                tracing::warn!(user_id, error = %e, "Failed to store login session");
            }
        }
    }

    Ok((status, Json(body)))
}

/// GET /users/session/{user_id}
///
/// Report whether a login session is still active. A cache failure counts
/// as no session.
pub async fn check_session(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let active = matches!(state.cache.get(&session_key(user_id)).await, Ok(Some(_)));

    if active {
        Ok(Json(json!({ "active": true })))
    } else {
        Err(AppError::Unauthorized("Session expired or invalid".into()))
    }
}

/// GET /admin/users
pub async fn admin_list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let url = format!("{}/users", state.upstream.users_url);
    let (status, body) = state.upstream.forward(Method::GET, url, None).await?;
    Ok((status, Json(body)))
}

/// GET /admin/users/{id}
pub async fn admin_get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let url = format!("{}/users/{id}", state.upstream.users_url);
    let (status, body) = state.upstream.forward(Method::GET, url, None).await?;
    Ok((status, Json(body)))
}
