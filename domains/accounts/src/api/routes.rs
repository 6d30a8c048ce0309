//! Route definitions for Accounts domain API

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::accounts;
use super::middleware::AccountsState;

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new()
        .route("/v1/auth/signup", post(accounts::signup))
        .route("/v1/auth/signin", post(accounts::signin))
        .route("/v1/auth/signout", post(accounts::signout))
        .route("/v1/auth/me", get(accounts::me))
        .route("/v1/auth/password", put(accounts::change_password))
}
