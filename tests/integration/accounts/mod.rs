//! Accounts domain integration tests

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{
    authed_request, error_code, expect_status, unauthed_request, TestApp,
};

async fn signup(app: &TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    let req = unauthed_request(
        Method::POST,
        "/v1/auth/signup",
        Some(json!({ "email": email, "password": password })),
    );
    let resp = app.request(req).await;
    let status = resp.status();
    let parsed = crate::common::parse_body(resp).await;
    (status, parsed)
}

async fn signin(app: &TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    let req = unauthed_request(
        Method::POST,
        "/v1/auth/signin",
        Some(json!({ "email": email, "password": password })),
    );
    let resp = app.request(req).await;
    let status = resp.status();
    let parsed = crate::common::parse_body(resp).await;
    (status, parsed)
}

#[tokio::test]
async fn test_signup_returns_session() {
    let app = TestApp::new();

    let (status, body) = signup(&app, "new@example.com", "secret123").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "new@example.com");
    assert!(!body["uid"].as_str().unwrap().is_empty());
    assert!(!body["id_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_duplicate_email_rejected() {
    let app = TestApp::new();
    signup(&app, "dup@example.com", "secret123").await;

    let (status, body) = signup(&app, "dup@example.com", "otherpass").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("already registered"));
}

#[tokio::test]
async fn test_signup_rejects_invalid_email_and_short_password() {
    let app = TestApp::new();

    let (status, _) = signup(&app, "not-an-email", "secret123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = signup(&app, "ok@example.com", "short").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signin_roundtrip() {
    let app = TestApp::new();
    signup(&app, "a@example.com", "secret123").await;

    let (status, body) = signin(&app, "a@example.com", "secret123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@example.com");
}

#[tokio::test]
async fn test_signin_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    signup(&app, "a@example.com", "secret123").await;

    let (status, body) = signin(&app, "a@example.com", "wrongpass").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn test_me_returns_caller_identity() {
    let app = TestApp::new();
    let session = app.seed_session("me@example.com", "secret123");

    let req = authed_request(Method::GET, "/v1/auth/me", &session.id_token, None);
    let body = expect_status(app.request(req).await, StatusCode::OK).await;

    assert_eq!(body["uid"], session.uid);
    assert_eq!(body["email"], "me@example.com");
}

#[tokio::test]
async fn test_me_requires_auth() {
    let app = TestApp::new();

    let resp = app
        .request(unauthed_request(Method::GET, "/v1/auth/me", None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signout_revokes_the_session() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let req = authed_request(Method::POST, "/v1/auth/signout", &session.id_token, None);
    let resp = app.request(req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The revoked token no longer authenticates
    let req = authed_request(Method::GET, "/v1/auth/me", &session.id_token, None);
    let resp = app.request(req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(resp).await, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_change_password_requires_correct_current_password() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let req = authed_request(
        Method::PUT,
        "/v1/auth/password",
        &session.id_token,
        Some(json!({ "current_password": "wrongpass", "new_password": "newsecret" })),
    );
    let resp = app.request(req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Password unchanged
    let (status, _) = signin(&app, "a@example.com", "secret123").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = signin(&app, "a@example.com", "newsecret").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_rotates_credentials() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let req = authed_request(
        Method::PUT,
        "/v1/auth/password",
        &session.id_token,
        Some(json!({ "current_password": "secret123", "new_password": "newsecret" })),
    );
    let body = expect_status(app.request(req).await, StatusCode::OK).await;
    assert!(!body["id_token"].as_str().unwrap().is_empty());

    let (status, _) = signin(&app, "a@example.com", "newsecret").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = signin(&app, "a@example.com", "secret123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_rejects_weak_new_password() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let req = authed_request(
        Method::PUT,
        "/v1/auth/password",
        &session.id_token,
        Some(json!({ "current_password": "secret123", "new_password": "short" })),
    );
    let resp = app.request(req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
