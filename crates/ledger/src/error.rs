use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fleet_core::error::CoreError;
use fleet_db::DbErrorKind;
use serde_json::json;

use crate::admission::{AdmissionError, RejectionSource};
use crate::store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// The interesting mapping is [`AdmissionError`], which carries the
/// protocol's full failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fleet_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An admission protocol outcome.
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// A storage error outside the admission path.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Unavailable(msg) => (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    msg.clone(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Admission(err) => classify_admission_error(err),

            AppError::Store(StoreError::Database(err)) => classify_db_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map an admission outcome to an HTTP status, error code, and message.
///
/// `AlreadyRented` is an expected outcome, not a fault, and carries its
/// source so clients can tell a cached rejection from an authoritative one.
fn classify_admission_error(err: &AdmissionError) -> (StatusCode, &'static str, String) {
    match err {
        AdmissionError::InvalidRequest(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        AdmissionError::CarNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Car with id {id} not found"),
        ),
        AdmissionError::RentalNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Rental with id {id} not found"),
        ),
        AdmissionError::AlreadyRented { car_id, source } => {
            let origin = match source {
                RejectionSource::Cache => "cache",
                RejectionSource::Registry => "registry",
                RejectionSource::Race => "concurrent request",
            };
            (
                StatusCode::CONFLICT,
                "ALREADY_RENTED",
                format!("Car {car_id} is already rented ({origin})"),
            )
        }
        AdmissionError::UpstreamUnavailable(msg) => {
            tracing::error!(error = %msg, "Registry unavailable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                msg.clone(),
            )
        }
        AdmissionError::PropagationFailure { car_id, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "PROPAGATION_FAILURE",
            format!("Failed to propagate rental status for car {car_id}"),
        ),
        AdmissionError::Storage(StoreError::Database(err)) => classify_db_error(err),
    }
}

/// Map a sqlx error to an HTTP status, error code, and message.
fn classify_db_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match fleet_db::classify_db_error(err) {
        DbErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        DbErrorKind::UniqueViolation(constraint) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
