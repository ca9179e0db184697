use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use fleet_cache::MemoryCache;
use fleet_core::types::DbId;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fleet_ledger::admission::AdmissionController;
use fleet_ledger::config::Config;
use fleet_ledger::registry_client::{CarView, RegistryApi, RegistryError, StatusWriteOutcome};
use fleet_ledger::router::build_router;
use fleet_ledger::state::AppState;
use fleet_ledger::store::MemoryRentalStore;

/// In-process stand-in for the fleet registry, with the same
/// compare-and-swap semantics as the real service.
pub struct StubRegistry {
    cars: Mutex<HashMap<DbId, bool>>,
    pub reachable: std::sync::atomic::AtomicBool,
}

impl Default for StubRegistry {
    fn default() -> Self {
        Self {
            cars: Mutex::new(HashMap::new()),
            reachable: std::sync::atomic::AtomicBool::new(true),
        }
    }
}

impl StubRegistry {
    pub fn with_car(id: DbId, is_rented: bool) -> Self {
        let registry = Self::default();
        registry.cars.lock().unwrap().insert(id, is_rented);
        registry
    }

    pub fn is_rented(&self, id: DbId) -> bool {
        *self.cars.lock().unwrap().get(&id).unwrap()
    }
}

#[async_trait]
impl RegistryApi for StubRegistry {
    async fn fetch_car(&self, id: DbId) -> Result<Option<CarView>, RegistryError> {
        if !self.reachable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(RegistryError::Request("connection refused".into()));
        }
        Ok(self
            .cars
            .lock()
            .unwrap()
            .get(&id)
            .map(|&is_rented| CarView { id, is_rented }))
    }

    async fn write_status(
        &self,
        id: DbId,
        is_rented: bool,
        expected: Option<bool>,
    ) -> Result<StatusWriteOutcome, RegistryError> {
        if !self.reachable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(RegistryError::Request("connection refused".into()));
        }
        let mut cars = self.cars.lock().unwrap();
        match cars.get_mut(&id) {
            None => Ok(StatusWriteOutcome::NotFound),
            Some(flag) => {
                if let Some(prev) = expected {
                    if *flag != prev {
                        return Ok(StatusWriteOutcome::Conflict);
                    }
                }
                *flag = is_rented;
                Ok(StatusWriteOutcome::Updated)
            }
        }
    }
}

/// Test application with handles to its collaborators.
pub struct TestApp {
    pub app: Router,
    pub registry: Arc<StubRegistry>,
    pub cache: Arc<MemoryCache>,
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        registry_url: "http://localhost:8002".to_string(),
        registry_timeout_secs: 10,
        redis_url: "redis://localhost:6379".to_string(),
        redis_max_connections: 16,
        reconcile_interval_secs: 60,
    }
}

/// Build the full application router over in-memory backends and a stub
/// registry. Mirrors the construction in `main.rs`.
pub fn build_test_app(registry: StubRegistry) -> TestApp {
    let store = Arc::new(MemoryRentalStore::new());
    let registry = Arc::new(registry);
    let cache = Arc::new(MemoryCache::new());
    let config = test_config();

    let admission = Arc::new(AdmissionController::new(
        store.clone(),
        registry.clone(),
        cache.clone(),
    ));

    let state = AppState {
        admission,
        store,
    };

    TestApp {
        app: build_router(state, &config),
        registry,
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

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
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

/// A valid rental request for the given car.
pub fn rental_payload(user_id: DbId, car_id: DbId) -> serde_json::Value {
    serde_json::json!({
        "user_id": user_id,
        "car_id": car_id,
        "start_date": "2024-01-01",
        "end_date": "2024-01-05",
    })
}
