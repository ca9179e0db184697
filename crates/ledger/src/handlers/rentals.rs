//! Handlers for rentals.
//!
//! Creation and deletion delegate to the admission controller; the handler
//! layer only translates between HTTP and the protocol.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fleet_core::types::DbId;
use fleet_db::models::rental::CreateRental;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /rentals
///
/// Run the admission protocol for a rental request.
pub async fn create_rental(
    State(state): State<AppState>,
    Json(input): Json<CreateRental>,
) -> AppResult<impl IntoResponse> {
    let rental = state.admission.admit(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Car rented successfully",
            "rental_id": rental.id,
        })),
    ))
}

/// GET /rentals
pub async fn list_rentals(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rentals = state.store.list().await?;
    Ok(Json(rentals))
}

/// DELETE /rentals/{id}
///
/// Remove a rental; an ongoing rental releases its car on the way out.
pub async fn delete_rental(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.admission.withdraw(id).await?;

    Ok(Json(json!({ "message": "Rental deleted successfully" })))
}
