//! Router assembly and middleware stack.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::Config;
use crate::handlers::{cars, health, rentals, users};
use crate::state::AppState;

/// Build the full application router with all middleware layers.
///
/// The route table mirrors the three backends one-to-one; the gateway adds
/// no logic beyond session bookkeeping and failure translation.
///
/// ```text
/// POST   /users/register            -> directory
/// POST   /users/login               -> directory (+ session entry)
/// GET    /users/session/{user_id}   -> session check (cache only)
/// GET    /admin/users               -> directory
/// GET    /admin/users/{id}          -> directory
/// GET    /cars, POST /cars          -> registry
/// GET    /cars/{id}, PUT, DELETE    -> registry
/// PUT    /cars/{id}/status          -> registry
/// POST   /rentals, GET /rentals     -> ledger
/// DELETE /rentals/{id}              -> ledger
/// ```
pub fn build_router(state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(health::health))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/session/{user_id}", get(users::check_session))
        .route("/admin/users", get(users::admin_list_users))
        .route("/admin/users/{id}", get(users::admin_get_user))
        .route("/cars", get(cars::list).post(cars::create))
        .route(
            "/cars/{id}",
            get(cars::get).put(cars::update).delete(cars::delete),
        )
        .route("/cars/{id}/status", put(cars::update_status))
        .route("/rentals", get(rentals::list).post(rentals::create))
        .route("/rentals/{id}", delete(rentals::delete))
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Build the CORS middleware layer from server configuration.
///
/// Panics at startup if any configured origin is invalid, which is the
/// desired behaviour -- we want misconfiguration to fail fast.
fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
