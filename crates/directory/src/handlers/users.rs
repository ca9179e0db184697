//! Handlers for registration, login, and user lookup.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fleet_core::error::CoreError;
use fleet_core::types::DbId;
use fleet_db::models::user::{LoginRequest, RegisterUser, UserResponse};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::password::{hash_password, verify_password};
use crate::state::AppState;

/// Lifetime of a login session entry.
const SESSION_TTL: Duration = Duration::from_secs(3600);

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUser>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Argon2 hashing is CPU-bound; keep it off the async workers.
    let password = input.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))?
        .map_err(|e| AppError::Core(CoreError::Internal(format!("password hashing: {e}"))))?;

    let user = state
        .store
        .create(&input.username, &input.email, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user_id": user.id,
        })),
    ))
}

/// POST /login
///
/// The same 401 is returned for an unknown username and a wrong password,
/// so responses do not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .store
        .find_by_username(&input.username)
        .await?
        .ok_or_else(unauthorized)?;

    let password = input.password;
    let password_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))?
        .map_err(|e| AppError::Core(CoreError::Internal(format!("password verification: {e}"))))?;

    if !verified {
        return Err(unauthorized());
    }

    let session_key = format!("user:{}:session", user.id);
    if let Err(e) = state
        .cache
        .set_with_ttl(&session_key, "active", SESSION_TTL)
        .await
    {
        tracing::warn!(user_id = user.id, error = %e, "Failed to store login session");
    }

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "user_id": user.id,
    })))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = state.store.list().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(UserResponse::from(user)))
}

fn unauthorized() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}
