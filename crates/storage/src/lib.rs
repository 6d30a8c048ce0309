//! AdAlchemy Artifact Store
//!
//! Durable object storage for generated images, addressed by path and
//! returning retrievable URLs:
//! - Firebase Storage integration for production
//! - Recording mock with programmable failures for testing

pub mod firebase;
pub mod mock;

use adalchemy_common::DataUri;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage request error: {0}")]
    Request(String),

    #[error("Storage response error: {0}")]
    Response(String),

    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),
}

/// Artifact store configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider (firebase, mock)
    pub provider: String,
    /// Bucket name (e.g. `my-project.appspot.com`)
    pub bucket: String,
    /// Override for the storage base URL (tests, emulators)
    pub base_url: Option<String>,
}

impl StorageConfig {
    /// Create storage config from environment variables
    pub fn from_env() -> Result<Self, StorageError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_default();
        let base_url = std::env::var("STORAGE_BASE_URL").ok();

        if provider != "mock" && bucket.is_empty() {
            return Err(StorageError::Configuration(
                "STORAGE_BUCKET is required for the firebase provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            bucket,
            base_url,
        })
    }
}

/// Artifact store trait for blob storage backends.
///
/// `upload` persists one encoded image under the given path and
/// returns a durable retrieval URL.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn upload(&self, path: &str, image: &DataUri) -> Result<String, StorageError>;
}

/// Factory for creating ArtifactStore implementations
pub struct ArtifactStoreFactory;

impl ArtifactStoreFactory {
    pub fn create(config: StorageConfig) -> Result<Box<dyn ArtifactStore>, StorageError> {
        match config.provider.as_str() {
            "firebase" => {
                tracing::info!(bucket = %config.bucket, "Creating Firebase artifact store");
                Ok(Box::new(firebase::FirebaseArtifactStore::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock artifact store");
                Ok(Box::new(mock::MockArtifactStore::new()))
            }
            provider => Err(StorageError::Configuration(format!(
                "Unknown storage provider: {}. Supported providers: firebase, mock",
                provider
            ))),
        }
    }
}
