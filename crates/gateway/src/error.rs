use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for gateway handlers.
///
/// The gateway relays upstream error bodies verbatim; this type only covers
/// failures the gateway itself produces.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The upstream service could not be reached at all.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// No valid session for the requested user.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Upstream unavailable");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
