//! Route definitions for the user directory.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User directory routes mounted at the root.
///
/// ```text
/// POST /register     -> register
/// POST /login        -> login
/// GET  /users        -> list_users
/// GET  /users/{id}   -> get_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
}
