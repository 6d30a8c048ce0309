//! AdAlchemy History Ledger
//!
//! Append-only per-user record store for completed generations,
//! queryable by owner and sorted by creation time:
//! - Firestore integration for production
//! - In-memory mock for testing and development
//!
//! Entries are immutable once appended; the application never updates
//! or deletes them.

pub mod firestore;
pub mod mock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger configuration error: {0}")]
    Configuration(String),

    #[error("Ledger request error: {0}")]
    Request(String),

    #[error("Ledger response error: {0}")]
    Response(String),
}

/// A persisted generation record.
///
/// `created_at` is server-assigned at append time; `image_urls` holds
/// only URLs that were successfully uploaded, ordered by synthesis
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub prompt: String,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new record; id and timestamp are assigned on append
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    pub user_id: String,
    pub user_email: String,
    pub prompt: String,
    pub image_urls: Vec<String>,
}

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Ledger provider (firestore, mock)
    pub provider: String,
    /// Cloud project id
    pub project_id: String,
    /// Collection holding generation records
    pub collection: String,
    /// Override for the Firestore base URL (tests, emulators)
    pub base_url: Option<String>,
}

impl LedgerConfig {
    /// Create ledger config from environment variables
    pub fn from_env() -> Result<Self, LedgerError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("LEDGER_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let project_id = std::env::var("FIREBASE_PROJECT_ID").unwrap_or_default();
        let collection = std::env::var("LEDGER_COLLECTION")
            .unwrap_or_else(|_| "generationHistory".to_string());
        let base_url = std::env::var("LEDGER_BASE_URL").ok();

        if provider != "mock" && project_id.is_empty() {
            return Err(LedgerError::Configuration(
                "FIREBASE_PROJECT_ID is required for the firestore provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            project_id,
            collection,
            base_url,
        })
    }
}

/// History Ledger trait for document-store backends
#[async_trait::async_trait]
pub trait HistoryLedger: Send + Sync {
    /// Append one immutable record; the backend assigns id and timestamp
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, LedgerError>;

    /// Owner-filtered read, newest first, at most `limit` entries
    async fn list_recent(&self, user_id: &str, limit: i64)
        -> Result<Vec<HistoryEntry>, LedgerError>;
}

/// Factory for creating HistoryLedger implementations
pub struct HistoryLedgerFactory;

impl HistoryLedgerFactory {
    pub fn create(config: LedgerConfig) -> Result<Box<dyn HistoryLedger>, LedgerError> {
        match config.provider.as_str() {
            "firestore" => {
                tracing::info!(project = %config.project_id, collection = %config.collection, "Creating Firestore ledger");
                Ok(Box::new(firestore::FirestoreLedger::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock ledger");
                Ok(Box::new(mock::MockLedger::new()))
            }
            provider => Err(LedgerError::Configuration(format!(
                "Unknown ledger provider: {}. Supported providers: firestore, mock",
                provider
            ))),
        }
    }
}
