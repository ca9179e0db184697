//! Integration tests for registration, login, and user lookup.

mod common;

use axum::http::StatusCode;
use common::{assert_status, build_test_app, get, post_json, register_payload};
use fleet_cache::Cache;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registering_a_user_returns_its_id() {
    let test = build_test_app();

    let response = post_json(test.app, "/register", register_payload()).await;
    let json = assert_status(response, StatusCode::CREATED).await;
    assert_eq!(json["message"], "User created successfully");
    assert_eq!(json["user_id"], 1);
}

#[tokio::test]
async fn registering_a_taken_email_conflicts() {
    let test = build_test_app();

    post_json(test.app.clone(), "/register", register_payload()).await;

    let mut payload = register_payload();
    payload["username"] = serde_json::json!("grace");

    let response = post_json(test.app, "/register", payload).await;
    let json = assert_status(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn registration_rejects_a_short_password() {
    let test = build_test_app();

    let mut payload = register_payload();
    payload["password"] = serde_json::json!("short");

    let response = post_json(test.app, "/register", payload).await;
    assert_status(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn registration_rejects_a_malformed_email() {
    let test = build_test_app();

    let mut payload = register_payload();
    payload["email"] = serde_json::json!("not-an-address");

    let response = post_json(test.app, "/register", payload).await;
    assert_status(response, StatusCode::BAD_REQUEST).await;
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_the_right_password_succeeds_and_stores_a_session() {
    let test = build_test_app();
    post_json(test.app.clone(), "/register", register_payload()).await;

    let response = post_json(
        test.app,
        "/login",
        serde_json::json!({ "username": "ada", "password": "long-enough-password" }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["message"], "Login successful");
    assert_eq!(json["user_id"], 1);

    let session = test.cache.get("user:1:session").await.unwrap();
    assert_eq!(session.as_deref(), Some("active"));
}

#[tokio::test]
async fn login_with_the_wrong_password_is_unauthorized() {
    let test = build_test_app();
    post_json(test.app.clone(), "/register", register_payload()).await;

    let response = post_json(
        test.app,
        "/login",
        serde_json::json!({ "username": "ada", "password": "not-the-password" }),
    )
    .await;
    let json = assert_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_for_an_unknown_user_gets_the_same_401_as_a_bad_password() {
    let test = build_test_app();

    let response = post_json(
        test.app,
        "/login",
        serde_json::json!({ "username": "nobody", "password": "whatever-it-is" }),
    )
    .await;
    let json = assert_status(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["error"], "Invalid username or password");
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_users_never_exposes_password_hashes() {
    let test = build_test_app();
    post_json(test.app.clone(), "/register", register_payload()).await;

    let response = get(test.app, "/users").await;
    let json = assert_status(response, StatusCode::OK).await;

    let users = json.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "ada");
    assert!(users[0].get("password_hash").is_none());
    assert!(users[0].get("password").is_none());
}

#[tokio::test]
async fn fetching_a_user_by_id_returns_the_safe_shape() {
    let test = build_test_app();
    post_json(test.app.clone(), "/register", register_payload()).await;

    let response = get(test.app, "/users/1").await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["email"], "ada@example.com");
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn fetching_an_unknown_user_returns_404() {
    let test = build_test_app();

    let response = get(test.app, "/users/99").await;
    let json = assert_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let test = build_test_app();

    let response = get(test.app, "/health").await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["status"], "ok");
}
