//! Shared utilities, configuration, and error handling for AdAlchemy
//!
//! This crate provides common functionality used across the AdAlchemy application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - The `DataUri` value type for inline-encoded images
//! - Custom axum extractors

pub mod config;
pub mod data_uri;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use data_uri::DataUri;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
