//! Integration tests for the gateway's pass-through behaviour, session
//! bookkeeping, and failure translation.
//!
//! Upstreams are small in-process axum servers bound to ephemeral ports.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use fleet_cache::MemoryCache;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use fleet_gateway::config::Config;
use fleet_gateway::router::build_router;
use fleet_gateway::state::AppState;
use fleet_gateway::upstream::Upstream;

/// Serve a stub upstream on an ephemeral port, returning its base URL.
async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Reserve a port with nothing listening on it.
async fn dead_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn test_config(users_url: &str, cars_url: &str, rentals_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        user_service_url: users_url.to_string(),
        car_service_url: cars_url.to_string(),
        rental_service_url: rentals_url.to_string(),
        upstream_timeout_secs: 5,
        redis_url: "redis://localhost:6379".to_string(),
        redis_max_connections: 16,
    }
}

struct TestApp {
    app: Router,
    cache: Arc<MemoryCache>,
}

fn build_test_app(config: Config) -> TestApp {
    let cache = Arc::new(MemoryCache::new());
    let state = AppState {
        upstream: Arc::new(Upstream::new(&config)),
        cache: cache.clone(),
    };
    TestApp {
        app: build_router(state, &config),
        cache,
    }
}

async fn send_get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn send_post(app: Router, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Pass-through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forwards_car_listing_with_status_and_body() {
    let cars = spawn_upstream(Router::new().route(
        "/cars",
        get(|| async { Json(json!([{ "id": 1, "brand": "Renault", "is_rented": false }])) }),
    ))
    .await;
    let dead = dead_upstream().await;
    let test = build_test_app(test_config(&dead, &cars, &dead));

    let response = send_get(test.app, "/cars").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json[0]["brand"], "Renault");
}

#[tokio::test]
async fn relays_upstream_error_envelopes_untouched() {
    let rentals = spawn_upstream(Router::new().route(
        "/rentals",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Car 42 is already rented (cache)", "code": "ALREADY_RENTED" })),
            )
        }),
    ))
    .await;
    let dead = dead_upstream().await;
    let test = build_test_app(test_config(&dead, &dead, &rentals));

    let response = send_post(
        test.app,
        "/rentals",
        json!({ "user_id": 1, "car_id": 42 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_RENTED");
}

#[tokio::test]
async fn unreachable_upstream_maps_to_bad_gateway() {
    let dead = dead_upstream().await;
    let test = build_test_app(test_config(&dead, &dead, &dead));

    let response = send_get(test.app, "/cars").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_login_stores_a_session() {
    let users = spawn_upstream(Router::new().route(
        "/login",
        post(|| async { Json(json!({ "message": "Login successful", "user_id": 7 })) }),
    ))
    .await;
    let dead = dead_upstream().await;
    let test = build_test_app(test_config(&users, &dead, &dead));

    let response = send_post(
        test.app.clone(),
        "/users/login",
        json!({ "username": "ada", "password": "hunter2-plus" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The session is now visible through the session endpoint.
    let response = send_get(test.app.clone(), "/users/session/7").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["active"], true);

    // And stored under the gateway's key schema.
    use fleet_cache::Cache;
    let stored = test.cache.get("gateway:user:7:session").await.unwrap();
    assert_eq!(stored.as_deref(), Some("active"));
}

#[tokio::test]
async fn failed_login_stores_no_session() {
    let users = spawn_upstream(Router::new().route(
        "/login",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid username or password", "code": "UNAUTHORIZED" })),
            )
        }),
    ))
    .await;
    let dead = dead_upstream().await;
    let test = build_test_app(test_config(&users, &dead, &dead));

    let response = send_post(
        test.app.clone(),
        "/users/login",
        json!({ "username": "ada", "password": "wrong" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_get(test.app, "/users/session/7").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_session_is_unauthorized() {
    let dead = dead_upstream().await;
    let test = build_test_app(test_config(&dead, &dead, &dead));

    let response = send_get(test.app, "/users/session/99").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Registration pass-through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forwards_registration_to_the_directory() {
    let users = spawn_upstream(Router::new().route(
        "/register",
        post(|| async {
            (
                StatusCode::CREATED,
                Json(json!({ "message": "User created successfully", "user_id": 1 })),
            )
        }),
    ))
    .await;
    let dead = dead_upstream().await;
    let test = build_test_app(test_config(&users, &dead, &dead));

    let response = send_post(
        test.app,
        "/users/register",
        json!({ "username": "ada", "email": "ada@example.com", "password": "long-enough" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["user_id"], 1);
}
