//! Credential Gateway trait, types, configuration, and factory

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway configuration error: {0}")]
    Configuration(String),

    #[error("Gateway request error: {0}")]
    Request(String),

    #[error("Gateway response error: {0}")]
    Response(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email is already registered")]
    EmailInUse,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Invalid or expired token")]
    InvalidToken,
}

/// An authenticated user identity, as issued by the identity provider.
///
/// Owned and mutated exclusively by the Credential Gateway; the
/// application only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Tokens returned by sign-up, sign-in, and password-change operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds until `id_token` expires
    pub expires_in: u64,
}

/// Credential Gateway configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway provider (google, mock)
    pub provider: String,
    /// Web API key for the identity-toolkit endpoints
    pub api_key: String,
    /// Override for the identity-toolkit base URL (tests, emulators)
    pub base_url: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GatewayConfig {
    /// Create gateway config from environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("AUTH_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let api_key = std::env::var("FIREBASE_API_KEY").unwrap_or_default();
        let base_url = std::env::var("AUTH_BASE_URL").ok();

        if provider != "mock" && api_key.is_empty() {
            return Err(GatewayError::Configuration(
                "FIREBASE_API_KEY is required for the google provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            base_url,
        })
    }
}

/// Credential Gateway trait over the hosted identity provider.
///
/// All operations are opaque calls; the application depends only on
/// their success/failure outcome and the shape of the resulting
/// principal.
#[async_trait::async_trait]
pub trait CredentialGateway: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError>;

    /// Invalidate the session, where the provider supports it
    async fn sign_out(&self, id_token: &str) -> Result<(), GatewayError>;

    /// Re-verify the current password before a sensitive operation
    async fn reauthenticate(&self, email: &str, current_password: &str)
        -> Result<Session, GatewayError>;

    /// Replace the password; returns fresh tokens
    async fn change_password(
        &self,
        id_token: &str,
        new_password: &str,
    ) -> Result<Session, GatewayError>;

    /// Resolve a bearer token to the principal it identifies
    async fn lookup(&self, id_token: &str) -> Result<Principal, GatewayError>;
}

/// Factory for creating CredentialGateway implementations
pub struct CredentialGatewayFactory;

impl CredentialGatewayFactory {
    pub fn create(config: GatewayConfig) -> Result<Box<dyn CredentialGateway>, GatewayError> {
        match config.provider.as_str() {
            "google" => {
                tracing::info!("Creating identity-toolkit credential gateway");
                Ok(Box::new(crate::identity_toolkit::IdentityToolkitGateway::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock credential gateway");
                Ok(Box::new(crate::mock::MockCredentialGateway::new()))
            }
            provider => Err(GatewayError::Configuration(format!(
                "Unknown auth provider: {}. Supported providers: google, mock",
                provider
            ))),
        }
    }
}
