//! Integration tests for the car fleet endpoints, with a focus on the
//! status-mutation contract and the cache write-through behaviour.

mod common;

use axum::http::StatusCode;
use common::{assert_status, build_test_app, car_payload, delete, get, post_json, put_json};
use fleet_cache::Cache;

// ---------------------------------------------------------------------------
// Creation and lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_car_starts_unrented_and_primes_the_cache() {
    let test = build_test_app();

    let response = post_json(test.app.clone(), "/cars", car_payload()).await;
    let json = assert_status(response, StatusCode::CREATED).await;

    assert_eq!(json["is_rented"], false);
    let id = json["id"].as_i64().unwrap();

    // Creation writes the availability tag through to the cache.
    let cached = test.cache.get(&format!("asset_status:{id}")).await.unwrap();
    assert_eq!(cached.as_deref(), Some("available"));
}

#[tokio::test]
async fn get_unknown_car_returns_404() {
    let test = build_test_app();

    let response = get(test.app, "/cars/999").await;
    let json = assert_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_car_rejects_an_empty_brand() {
    let test = build_test_app();

    let mut payload = car_payload();
    payload["brand"] = serde_json::json!("");

    let response = post_json(test.app, "/cars", payload).await;
    assert_status(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn list_returns_all_cars() {
    let test = build_test_app();

    post_json(test.app.clone(), "/cars", car_payload()).await;
    post_json(test.app.clone(), "/cars", car_payload()).await;

    let response = get(test.app, "/cars").await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Status mutation contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_cas_applies_when_the_expected_value_matches() {
    let test = build_test_app();
    post_json(test.app.clone(), "/cars", car_payload()).await;

    let response = put_json(
        test.app.clone(),
        "/cars/1/status",
        serde_json::json!({ "is_rented": true, "expected": false }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["is_rented"], true);

    let cached = test.cache.get("asset_status:1").await.unwrap();
    assert_eq!(cached.as_deref(), Some("rented"));
}

#[tokio::test]
async fn status_cas_mismatch_returns_409_without_writing() {
    let test = build_test_app();
    post_json(test.app.clone(), "/cars", car_payload()).await;

    // The car is not rented, so expecting `true` must lose.
    let response = put_json(
        test.app.clone(),
        "/cars/1/status",
        serde_json::json!({ "is_rented": false, "expected": true }),
    )
    .await;
    let json = assert_status(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");

    // The flag is untouched.
    let response = get(test.app, "/cars/1").await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["is_rented"], false);
}

#[tokio::test]
async fn status_overwrite_without_expected_is_last_writer_wins() {
    let test = build_test_app();
    post_json(test.app.clone(), "/cars", car_payload()).await;

    put_json(
        test.app.clone(),
        "/cars/1/status",
        serde_json::json!({ "is_rented": true, "expected": false }),
    )
    .await;

    // No guard: overwrite back to available.
    let response = put_json(
        test.app.clone(),
        "/cars/1/status",
        serde_json::json!({ "is_rented": false }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["is_rented"], false);

    let cached = test.cache.get("asset_status:1").await.unwrap();
    assert_eq!(cached.as_deref(), Some("available"));
}

#[tokio::test]
async fn status_write_for_unknown_car_returns_404() {
    let test = build_test_app();

    let response = put_json(
        test.app,
        "/cars/42/status",
        serde_json::json!({ "is_rented": true, "expected": false }),
    )
    .await;
    assert_status(response, StatusCode::NOT_FOUND).await;
}

// ---------------------------------------------------------------------------
// Updates and deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_update_writes_the_flag_through_to_the_cache() {
    let test = build_test_app();
    post_json(test.app.clone(), "/cars", car_payload()).await;

    let mut payload = car_payload();
    payload["is_rented"] = serde_json::json!(true);
    payload["mileage"] = serde_json::json!(33000);

    let response = put_json(test.app.clone(), "/cars/1", payload).await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["is_rented"], true);
    assert_eq!(json["mileage"], 33000);

    let cached = test.cache.get("asset_status:1").await.unwrap();
    assert_eq!(cached.as_deref(), Some("rented"));
}

#[tokio::test]
async fn delete_removes_the_car_and_clears_its_cache_entry() {
    let test = build_test_app();
    post_json(test.app.clone(), "/cars", car_payload()).await;

    // Sanity: the entry exists before deletion.
    assert!(test.cache.get("asset_status:1").await.unwrap().is_some());

    let response = delete(test.app.clone(), "/cars/1").await;
    assert_status(response, StatusCode::OK).await;

    // The delete path is the only one that clears the cache entry.
    assert_eq!(test.cache.get("asset_status:1").await.unwrap(), None);

    let response = get(test.app, "/cars/1").await;
    assert_status(response, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn delete_unknown_car_returns_404() {
    let test = build_test_app();

    let response = delete(test.app, "/cars/7").await;
    assert_status(response, StatusCode::NOT_FOUND).await;
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok_with_store_status() {
    let test = build_test_app();

    let response = get(test.app, "/health").await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store_healthy"], true);
    assert!(json["version"].is_string());
}
