//! Firebase Storage implementation
//!
//! Uploads decoded image bytes via the media upload endpoint
//! (https://firebasestorage.googleapis.com/v0/b/{bucket}/o) and builds
//! the durable download URL from the returned download token.

use reqwest::Client;
use serde::Deserialize;

use adalchemy_common::DataUri;

use crate::{ArtifactStore, StorageConfig, StorageError};

const DEFAULT_BASE_URL: &str = "https://firebasestorage.googleapis.com";

/// Upload response; `downloadTokens` authorizes unauthenticated reads
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

/// Firebase Storage artifact store
pub struct FirebaseArtifactStore {
    client: Client,
    config: StorageConfig,
    base_url: String,
}

impl FirebaseArtifactStore {
    pub fn new(config: StorageConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client: Client::new(),
            config,
            base_url,
        }
    }

    /// Object paths are URL-encoded into a single path segment.
    /// Upload paths only contain `[A-Za-z0-9_./-]`, so `/` and `.`
    /// cover the reserved characters in practice.
    fn encode_object_path(path: &str) -> String {
        path.replace('/', "%2F")
    }
}

#[async_trait::async_trait]
impl ArtifactStore for FirebaseArtifactStore {
    async fn upload(&self, path: &str, image: &DataUri) -> Result<String, StorageError> {
        let bytes = image
            .decode()
            .map_err(|e| StorageError::InvalidPayload(e.to_string()))?;

        let url = format!(
            "{}/v0/b/{}/o?uploadType=media&name={}",
            self.base_url, self.config.bucket, path
        );

        tracing::debug!(path = %path, size = bytes.len(), "Uploading image to Firebase Storage");

        let response = self
            .client
            .post(&url)
            .header("content-type", image.content_type())
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            return Err(StorageError::Response(format!(
                "Firebase Storage returned {}: {}",
                status, error_body
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Response(format!("Failed to parse response: {}", e)))?;

        let token = upload.download_tokens.ok_or_else(|| {
            StorageError::Response("Upload response missing download token".to_string())
        })?;

        Ok(format!(
            "{}/v0/b/{}/o/{}?alt=media&token={}",
            self.base_url,
            self.config.bucket,
            Self::encode_object_path(&upload.name),
            token
        ))
    }
}
