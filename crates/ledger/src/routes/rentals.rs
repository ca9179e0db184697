//! Route definitions for rentals.
//!
//! All routes are mounted under `/rentals`.

use axum::routing::get;
use axum::Router;

use crate::handlers::rentals;
use crate::state::AppState;

/// Rental routes mounted at `/rentals`.
///
/// ```text
/// GET    /      -> list_rentals
/// POST   /      -> create_rental
/// DELETE /{id}  -> delete_rental
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(rentals::list_rentals).post(rentals::create_rental),
        )
        .route("/{id}", axum::routing::delete(rentals::delete_rental))
}
