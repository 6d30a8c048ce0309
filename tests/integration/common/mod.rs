//! Common test utilities and fixtures for integration tests
//!
//! Builds the full application router over the mock providers and
//! keeps concrete handles to them so tests can program failures and
//! assert on recorded calls.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use adalchemy_accounts::AccountsState;
use adalchemy_auth::mock::MockCredentialGateway;
use adalchemy_auth::{AuthBackend, CredentialGateway, Session};
use adalchemy_genai::mock::{MockPromptService, MockSynthesisService};
use adalchemy_generations::{GenerationWorkflow, GenerationsState, HistoryNotifier};
use adalchemy_ledger::mock::MockLedger;
use adalchemy_storage::mock::MockArtifactStore;

/// Test application: the composed router plus concrete mock handles
pub struct TestApp {
    pub gateway: Arc<MockCredentialGateway>,
    pub synthesis: Arc<MockSynthesisService>,
    pub prompts: Arc<MockPromptService>,
    pub store: Arc<MockArtifactStore>,
    pub ledger: Arc<MockLedger>,
    pub notifier: HistoryNotifier,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let gateway = Arc::new(MockCredentialGateway::new());
        let synthesis = Arc::new(MockSynthesisService::new());
        let prompts = Arc::new(MockPromptService::new());
        let store = Arc::new(MockArtifactStore::new());
        let ledger = Arc::new(MockLedger::new());
        let notifier = HistoryNotifier::new();

        let auth = AuthBackend::new(gateway.clone() as Arc<dyn CredentialGateway>);

        let workflow = Arc::new(GenerationWorkflow::new(
            synthesis.clone(),
            prompts.clone(),
            store.clone(),
            ledger.clone(),
            notifier.clone(),
        ));

        let generations_state = GenerationsState {
            workflow,
            notifier: notifier.clone(),
            auth: auth.clone(),
        };

        let accounts_state = AccountsState {
            gateway: gateway.clone() as Arc<dyn CredentialGateway>,
            auth,
        };

        let router = Router::new()
            .merge(adalchemy_generations::routes().with_state(generations_state))
            .merge(adalchemy_accounts::routes().with_state(accounts_state));

        TestApp {
            gateway,
            synthesis,
            prompts,
            store,
            ledger,
            notifier,
            router,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Seed an account and return a live session for it
    pub fn seed_session(&self, email: &str, password: &str) -> Session {
        self.gateway.seed_user(email, password)
    }

    /// Dispatch one request through the router
    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router().oneshot(req).await.unwrap()
    }
}

/// Helper: build an authenticated request
pub fn authed_request(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Helper: build an unauthenticated request
pub fn unauthed_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Helper: parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Helper: assert the standard error envelope and return its code
pub async fn error_code(response: Response<Body>) -> String {
    let body = parse_body(response).await;
    body["error"]["code"]
        .as_str()
        .expect("error envelope should carry a code")
        .to_string()
}

/// Helper: assert status then parse the body
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    parse_body(response).await
}
