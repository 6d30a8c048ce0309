//! Mock artifact store
//!
//! Records uploads and returns deterministic URLs. Failures are
//! programmable per path substring so tests can fail individual image
//! indices without knowing the request timestamp.

use std::sync::{Mutex, RwLock};

use adalchemy_common::DataUri;

use crate::{ArtifactStore, StorageError};

/// One recorded upload
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub path: String,
    pub content_type: String,
    pub size_bytes: usize,
}

/// Mock artifact store with recorded uploads and programmable failures
#[derive(Default)]
pub struct MockArtifactStore {
    uploads: Mutex<Vec<RecordedUpload>>,
    fail_substrings: RwLock<Vec<String>>,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any upload whose path contains `substring`
    pub fn fail_paths_containing(&self, substring: &str) {
        self.fail_substrings
            .write()
            .unwrap()
            .push(substring.to_string());
    }

    /// Snapshot of successful uploads, in call order
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn upload(&self, path: &str, image: &DataUri) -> Result<String, StorageError> {
        let should_fail = self
            .fail_substrings
            .read()
            .unwrap()
            .iter()
            .any(|s| path.contains(s.as_str()));

        if should_fail {
            tracing::debug!(path = %path, "Mock upload failing by configuration");
            return Err(StorageError::Response("mock upload failure".to_string()));
        }

        let bytes = image
            .decode()
            .map_err(|e| StorageError::InvalidPayload(e.to_string()))?;

        self.uploads.lock().unwrap().push(RecordedUpload {
            path: path.to_string(),
            content_type: image.content_type().to_string(),
            size_bytes: bytes.len(),
        });

        Ok(format!("https://storage.mock/{}?alt=media", path))
    }
}
