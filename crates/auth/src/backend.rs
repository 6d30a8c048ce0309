//! Concrete authentication backend
//!
//! Wraps the `CredentialGateway` and resolves bearer tokens to a
//! `Principal` once per request. There is no ambient auth state: every
//! handler receives the resolved principal explicitly via `AuthUser`.

use std::sync::Arc;

use crate::error::AuthError;
use crate::gateway::{CredentialGateway, GatewayError, Principal};

/// Authentication backend shared across domain states.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    gateway: Arc<dyn CredentialGateway>,
}

impl AuthBackend {
    pub fn new(gateway: Arc<dyn CredentialGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<dyn CredentialGateway> {
        &self.gateway
    }

    /// Resolve the bearer token to its principal via the gateway
    pub async fn authenticate(&self, id_token: &str) -> Result<Principal, AuthError> {
        match self.gateway.lookup(id_token).await {
            Ok(principal) => Ok(principal),
            Err(GatewayError::InvalidToken) => Err(AuthError::InvalidToken),
            Err(e) => {
                tracing::error!(error = %e, "Credential gateway lookup failed");
                Err(AuthError::AuthenticationFailed)
            }
        }
    }
}
