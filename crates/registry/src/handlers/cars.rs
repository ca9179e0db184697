//! Handlers for the car fleet.
//!
//! Every successful mutation writes the resulting availability tag through
//! to the status cache; the deletion handler is the only place a cache
//! entry is ever cleared.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fleet_core::error::CoreError;
use fleet_core::status::{status_key, AvailabilityTag};
use fleet_core::types::DbId;
use fleet_db::models::car::{CarStatusUpdate, CreateCar, UpdateCar};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::store::StatusWrite;

/// GET /cars
pub async fn list_cars(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cars = state.store.list().await?;
    Ok(Json(cars))
}

/// POST /cars
///
/// Register a new car. New cars always start unrented.
pub async fn create_car(
    State(state): State<AppState>,
    Json(input): Json<CreateCar>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let car = state.store.create(&input).await?;
    write_through(&state, car.id, car.is_rented).await;

    tracing::info!(car_id = car.id, brand = %car.brand, model = %car.model, "Car registered");

    Ok((StatusCode::CREATED, Json(car)))
}

/// GET /cars/{id}
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let car = state
        .store
        .get(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;

    Ok(Json(car))
}

/// PUT /cars/{id}
///
/// Overwrite a car's descriptive fields and rental flag.
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCar>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let car = state
        .store
        .update(id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;
    write_through(&state, id, car.is_rented).await;

    tracing::info!(car_id = id, "Car updated");

    Ok(Json(car))
}

/// PUT /cars/{id}/status
///
/// Write the rental flag. With `expected` present this is a compare-and-swap
/// and a lost swap answers 409 without writing.
pub async fn update_car_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CarStatusUpdate>,
) -> AppResult<impl IntoResponse> {
    match state
        .store
        .set_rented_status(id, input.is_rented, input.expected)
        .await?
    {
        StatusWrite::Updated(car) => {
            write_through(&state, id, car.is_rented).await;
            tracing::info!(car_id = id, is_rented = car.is_rented, "Car status updated");
            Ok(Json(car))
        }
        StatusWrite::Conflict => Err(AppError::Core(CoreError::Conflict(format!(
            "Car {id} status changed concurrently"
        )))),
        StatusWrite::NotFound => Err(AppError::Core(CoreError::NotFound { entity: "Car", id })),
    }
}

/// DELETE /cars/{id}
///
/// Delete a car and clear its cache entry. A store-level delete that
/// bypasses this handler would strand the entry.
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !state.store.delete(id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Car", id }));
    }

    if let Err(e) = state.cache.delete(&status_key(id)).await {
        tracing::warn!(car_id = id, error = %e, "Failed to clear cache entry for deleted car");
    }

    tracing::info!(car_id = id, "Car deleted");

    Ok(Json(json!({ "message": "Car deleted successfully" })))
}

/// Best-effort write-through of the availability tag.
///
/// Cache failures are logged and swallowed; the registry row remains the
/// source of truth and a later read repairs the cache.
async fn write_through(state: &AppState, id: DbId, is_rented: bool) {
    let tag = AvailabilityTag::from_rented(is_rented);
    if let Err(e) = state.cache.set(&status_key(id), tag.as_str()).await {
        tracing::warn!(car_id = id, error = %e, "Cache write-through failed");
    }
}
