//! Credential Gateway integration for AdAlchemy
//!
//! Wraps the hosted identity provider behind the `CredentialGateway`
//! trait and provides axum extractors that resolve the bearer token to
//! a `Principal` once per request. Works with any domain state
//! implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod error;
mod extractors;
mod gateway;
mod identity_toolkit;
pub mod mock;

pub use backend::AuthBackend;
pub use error::AuthError;
pub use extractors::{AuthUser, BearerToken};
pub use gateway::{
    CredentialGateway, CredentialGatewayFactory, GatewayConfig, GatewayError, Principal, Session,
};
pub use identity_toolkit::IdentityToolkitGateway;
