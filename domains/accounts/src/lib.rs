//! Accounts domain: sign-up, sign-in, session, and password management
//!
//! A thin HTTP surface over the credential gateway; account state
//! itself lives entirely with the identity provider.

pub mod api;

pub use api::routes;
pub use api::AccountsState;
