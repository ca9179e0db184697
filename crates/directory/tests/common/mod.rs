use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use fleet_cache::MemoryCache;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fleet_directory::config::Config;
use fleet_directory::router::build_router;
use fleet_directory::state::AppState;
use fleet_directory::store::MemoryUserStore;

/// Test application with a handle to the cache so tests can assert on
/// session entries directly.
pub struct TestApp {
    pub app: Router,
    pub cache: Arc<MemoryCache>,
}

/// Build a test `Config` with safe defaults.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        redis_url: "redis://localhost:6379".to_string(),
        redis_max_connections: 16,
    }
}

/// Build the full application router over in-memory backends.
///
/// Mirrors the construction in `main.rs` so tests exercise the same
/// middleware stack production uses.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(MemoryUserStore::new());
    let cache = Arc::new(MemoryCache::new());
    let config = test_config();

    let state = AppState {
        store,
        cache: cache.clone(),
    };

    TestApp {
        app: build_router(state, &config),
        cache,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
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

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status code, printing the body on mismatch.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {json}");
    json
}

/// A valid registration payload.
pub fn register_payload() -> serde_json::Value {
    serde_json::json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "long-enough-password",
    })
}
