//! Accounts domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;

use adalchemy_auth::{AuthBackend, CredentialGateway};

/// Application state for the Accounts domain
#[derive(Clone)]
pub struct AccountsState {
    pub gateway: Arc<dyn CredentialGateway>,
    pub auth: AuthBackend,
}

impl FromRef<AccountsState> for AuthBackend {
    fn from_ref(state: &AccountsState) -> Self {
        state.auth.clone()
    }
}
