//! Generations domain integration tests

use std::time::Duration;

use axum::http::{Method, StatusCode};
use futures::StreamExt;
use serde_json::{json, Value};

use adalchemy_genai::mock::MockSynthesisOutcome;

use crate::common::{
    authed_request, error_code, expect_status, unauthed_request, TestApp,
};

const PROMPT: &str = "A vibrant summer sale banner with sneakers";

async fn create_generation(app: &TestApp, token: &str, prompt: &str) -> (StatusCode, Value) {
    let req = authed_request(
        Method::POST,
        "/v1/generations",
        token,
        Some(json!({ "prompt": prompt })),
    );
    let resp = app.request(req).await;
    let status = resp.status();
    let parsed = crate::common::parse_body(resp).await;
    (status, parsed)
}

#[tokio::test]
async fn test_create_generation_returns_four_images() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let (status, body) = create_generation(&app, &session.id_token, PROMPT).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.synthesis.calls(), 4);
    assert_eq!(body["entry"]["prompt"], PROMPT);
    assert_eq!(body["entry"]["image_urls"].as_array().unwrap().len(), 4);
    assert!(body["warnings"].as_array().unwrap().is_empty());

    // One ledger record, attributed to the caller
    let entries = app.ledger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, session.uid);
    assert_eq!(entries[0].user_email, "a@example.com");
}

#[tokio::test]
async fn test_partial_synthesis_failure_returns_created_with_warnings() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");
    app.synthesis.push_outcomes([
        MockSynthesisOutcome::Image,
        MockSynthesisOutcome::Fail,
        MockSynthesisOutcome::Image,
        MockSynthesisOutcome::Image,
    ]);

    let (status, body) = create_generation(&app, &session.id_token, PROMPT).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["entry"]["image_urls"].as_array().unwrap().len(), 3);

    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["kind"], "synthesis_failed");
    assert_eq!(warnings[0]["index"], 1);

    // Surviving URLs keep synthesis index order: 0, 2, 3
    let urls: Vec<&str> = body["entry"]["image_urls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(urls[0].contains("banner_0.png"));
    assert!(urls[1].contains("banner_2.png"));
    assert!(urls[2].contains("banner_3.png"));
}

#[tokio::test]
async fn test_total_synthesis_failure_returns_bad_gateway() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");
    app.synthesis
        .push_outcomes(vec![MockSynthesisOutcome::Fail; 4]);

    let (status, body) = create_generation(&app, &session.id_token, PROMPT).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "SYNTHESIS_FAILED");
    assert!(app.store.uploads().is_empty());
    assert!(app.ledger.entries().is_empty());
}

#[tokio::test]
async fn test_all_uploads_failing_returns_bad_gateway() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");
    app.store.fail_paths_containing("banner_");

    let (status, body) = create_generation(&app, &session.id_token, PROMPT).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPLOAD_FAILED");
    assert!(app.ledger.entries().is_empty());
}

#[tokio::test]
async fn test_ledger_failure_returns_bad_gateway_and_keeps_blobs() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");
    app.ledger.fail_next_append();

    let (status, body) = create_generation(&app, &session.id_token, PROMPT).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "PERSISTENCE_FAILED");
    // Blobs were uploaded and are not retracted
    assert_eq!(app.store.uploads().len(), 4);
    assert!(app.ledger.entries().is_empty());
}

#[tokio::test]
async fn test_short_prompt_rejected_before_synthesis() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let (status, body) = create_generation(&app, &session.id_token, "too short").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(app.synthesis.calls(), 0);
}

#[tokio::test]
async fn test_overlong_prompt_rejected_before_synthesis() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let (status, _) = create_generation(&app, &session.id_token, &"x".repeat(501)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.synthesis.calls(), 0);
}

#[tokio::test]
async fn test_create_generation_requires_auth() {
    let app = TestApp::new();

    let req = unauthed_request(
        Method::POST,
        "/v1/generations",
        Some(json!({ "prompt": PROMPT })),
    );
    let resp = app.request(req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(resp).await, "MISSING_AUTHORIZATION");
    assert_eq!(app.synthesis.calls(), 0);
}

#[tokio::test]
async fn test_create_generation_rejects_unknown_token() {
    let app = TestApp::new();

    let req = authed_request(
        Method::POST,
        "/v1/generations",
        "mock-token-bogus",
        Some(json!({ "prompt": PROMPT })),
    );
    let resp = app.request(req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(resp).await, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_history_is_owner_scoped_and_newest_first() {
    let app = TestApp::new();
    let alice = app.seed_session("alice@example.com", "secret123");
    let bob = app.seed_session("bob@example.com", "secret123");

    create_generation(&app, &alice.id_token, "Alice's banner prompt one").await;
    create_generation(&app, &alice.id_token, "Alice's banner prompt two").await;
    create_generation(&app, &bob.id_token, "Bob's only banner prompt").await;

    let req = authed_request(Method::GET, "/v1/history", &alice.id_token, None);
    let body = expect_status(app.request(req).await, StatusCode::OK).await;

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["prompt"], "Alice's banner prompt two");
    assert_eq!(entries[1]["prompt"], "Alice's banner prompt one");

    let req = authed_request(Method::GET, "/v1/history", &bob.id_token, None);
    let body = expect_status(app.request(req).await, StatusCode::OK).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_honors_limit_parameter() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    for _ in 0..3 {
        create_generation(&app, &session.id_token, PROMPT).await;
    }

    let req = authed_request(Method::GET, "/v1/history?limit=2", &session.id_token, None);
    let body = expect_status(app.request(req).await, StatusCode::OK).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_history_requires_auth() {
    let app = TestApp::new();

    let resp = app
        .request(unauthed_request(Method::GET, "/v1/history", None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .request(unauthed_request(Method::GET, "/v1/history/events", None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_history_events_stream_is_owner_scoped() {
    let app = TestApp::new();
    let alice = app.seed_session("alice@example.com", "secret123");
    let bob = app.seed_session("bob@example.com", "secret123");

    // Open Alice's event stream before anything is generated
    let req = authed_request(Method::GET, "/v1/history/events", &alice.id_token, None);
    let response = app.request(req).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut body = response.into_body().into_data_stream();

    // Bob saves first, then Alice; only Alice's signal may surface here
    create_generation(&app, &bob.id_token, "Bob's only banner prompt").await;
    let (_, alice_body) =
        create_generation(&app, &alice.id_token, "Alice's banner prompt one").await;
    let alice_entry_id = alice_body["entry"]["id"].as_str().unwrap().to_string();

    let frame = tokio::time::timeout(Duration::from_secs(1), body.next())
        .await
        .expect("stream should yield an event")
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.contains("event: history.changed"));
    assert!(text.contains(&alice_entry_id));
    assert!(text.contains(&alice.uid));
    assert!(!text.contains(&bob.uid));

    // Nothing else pending: Bob's signal never reached this stream
    assert!(
        tokio::time::timeout(Duration::from_millis(100), body.next())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_generation_emits_history_changed_signal() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");
    let mut rx = app.notifier.subscribe();

    let (status, body) = create_generation(&app, &session.id_token, PROMPT).await;
    assert_eq!(status, StatusCode::CREATED);

    let signal = rx.recv().await.unwrap();
    assert_eq!(signal.user_id, session.uid);
    assert_eq!(signal.entry_id, body["entry"]["id"].as_str().unwrap());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_refine_prompt_calls_service_once() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let req = authed_request(
        Method::POST,
        "/v1/prompts/refine",
        &session.id_token,
        Some(json!({ "prompt": PROMPT })),
    );
    let body = expect_status(app.request(req).await, StatusCode::OK).await;

    assert!(body["refined_prompt"].as_str().unwrap().contains(PROMPT));
    assert_eq!(app.prompts.refine_calls(), 1);
}

#[tokio::test]
async fn test_refine_short_prompt_rejected_without_service_call() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let req = authed_request(
        Method::POST,
        "/v1/prompts/refine",
        &session.id_token,
        Some(json!({ "prompt": "too short" })),
    );
    let resp = app.request(req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.prompts.refine_calls(), 0);
}

#[tokio::test]
async fn test_refine_empty_model_response_returns_bad_gateway() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");
    app.prompts.set_empty_refine(true);

    let req = authed_request(
        Method::POST,
        "/v1/prompts/refine",
        &session.id_token,
        Some(json!({ "prompt": PROMPT })),
    );
    let resp = app.request(req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(resp).await, "REFINEMENT_FAILED");
}

#[tokio::test]
async fn test_suggestions_returns_four_prompts() {
    let app = TestApp::new();
    let session = app.seed_session("a@example.com", "secret123");

    let req = authed_request(
        Method::GET,
        "/v1/prompts/suggestions",
        &session.id_token,
        None,
    );
    let body = expect_status(app.request(req).await, StatusCode::OK).await;

    assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);
}
