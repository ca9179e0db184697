//! Route definitions for the car fleet.
//!
//! All routes are mounted under `/cars`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::cars;
use crate::state::AppState;

/// Car routes mounted at `/cars`.
///
/// ```text
/// GET    /             -> list_cars
/// POST   /             -> create_car
/// GET    /{id}         -> get_car
/// PUT    /{id}         -> update_car
/// DELETE /{id}         -> delete_car
/// PUT    /{id}/status  -> update_car_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cars::list_cars).post(cars::create_car))
        .route(
            "/{id}",
            get(cars::get_car)
                .put(cars::update_car)
                .delete(cars::delete_car),
        )
        .route("/{id}/status", put(cars::update_car_status))
}
