//! Generations domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;

use adalchemy_auth::AuthBackend;

use crate::domain::notify::HistoryNotifier;
use crate::domain::workflow::GenerationWorkflow;

/// Application state for the Generations domain
#[derive(Clone)]
pub struct GenerationsState {
    pub workflow: Arc<GenerationWorkflow>,
    pub notifier: HistoryNotifier,
    pub auth: AuthBackend,
}

impl FromRef<GenerationsState> for AuthBackend {
    fn from_ref(state: &GenerationsState) -> Self {
        state.auth.clone()
    }
}
