//! AdAlchemy application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::Router;

use adalchemy_accounts::AccountsState;
use adalchemy_auth::{AuthBackend, CredentialGateway, CredentialGatewayFactory, GatewayConfig};
use adalchemy_genai::{GenAiConfig, GenAiServiceFactory, PromptService, SynthesisService};
use adalchemy_generations::{GenerationWorkflow, GenerationsState, HistoryNotifier};
use adalchemy_ledger::{HistoryLedger, HistoryLedgerFactory, LedgerConfig};
use adalchemy_storage::{ArtifactStore, ArtifactStoreFactory, StorageConfig};

/// Create the main application router with all routes and middleware
pub async fn create_app() -> Result<Router, anyhow::Error> {
    // Create managed-service clients from environment
    let gateway_config = GatewayConfig::from_env()?;
    let gateway: Arc<dyn CredentialGateway> =
        Arc::from(CredentialGatewayFactory::create(gateway_config)?);

    let genai_config = GenAiConfig::from_env()?;
    let synthesis: Arc<dyn SynthesisService> =
        Arc::from(GenAiServiceFactory::create_synthesis(genai_config.clone())?);
    let prompts: Arc<dyn PromptService> =
        Arc::from(GenAiServiceFactory::create_prompt(genai_config)?);

    let storage_config = StorageConfig::from_env()?;
    let store: Arc<dyn ArtifactStore> = Arc::from(ArtifactStoreFactory::create(storage_config)?);

    let ledger_config = LedgerConfig::from_env()?;
    let ledger: Arc<dyn HistoryLedger> = Arc::from(HistoryLedgerFactory::create(ledger_config)?);

    // Shared infrastructure
    let notifier = HistoryNotifier::new();
    let auth = AuthBackend::new(gateway.clone());

    // Create Generations domain state
    let workflow = Arc::new(GenerationWorkflow::new(
        synthesis,
        prompts,
        store,
        ledger,
        notifier.clone(),
    ));
    let generations_state = GenerationsState {
        workflow,
        notifier,
        auth: auth.clone(),
    };

    // Create Accounts domain state
    let accounts_state = AccountsState { gateway, auth };

    // Build router — compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "AdAlchemy API v0.1.0" }))
        .merge(adalchemy_generations::routes().with_state(generations_state))
        .merge(adalchemy_accounts::routes().with_state(accounts_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
