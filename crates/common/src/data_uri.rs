//! `DataUri` value type
//!
//! Inline base64-encoded image content as produced by the synthesis
//! service (`data:image/png;base64,...`). Only syntactically valid
//! image data URIs construct; anything else is rejected at the seam
//! so the workflow never uploads garbage.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Regex for validating image data URIs (compiled once)
static DATA_URI_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^data:(image/[a-z0-9.+-]+);base64,([A-Za-z0-9+/]+={0,2})$")
        .expect("data URI regex is valid")
});

/// A syntactically valid, base64-encoded inline image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    raw: String,
    content_type: String,
}

/// Error parsing a data URI
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUriError {
    #[error("Not an image data URI")]
    InvalidFormat,

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),
}

impl DataUri {
    /// Parse and validate an image data URI
    pub fn parse(raw: &str) -> Result<Self, DataUriError> {
        let captures = DATA_URI_REGEX
            .captures(raw)
            .ok_or(DataUriError::InvalidFormat)?;

        let content_type = captures[1].to_string();

        Ok(Self {
            raw: raw.to_string(),
            content_type,
        })
    }

    /// MIME type of the encoded image (e.g. `image/png`)
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The full data URI string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Decode the base64 payload into raw image bytes
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        let payload = self
            .raw
            .split_once(";base64,")
            .map(|(_, p)| p)
            .unwrap_or_default();

        STANDARD
            .decode(payload)
            .map_err(|e| DataUriError::InvalidPayload(e.to_string()))
    }
}

impl FromStr for DataUri {
    type Err = DataUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataUri {
    type Error = DataUriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DataUri> for String {
    fn from(uri: DataUri) -> Self {
        uri.raw
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full payloads are huge; display the shape only
        write!(f, "data:{};base64,<{} bytes>", self.content_type, self.raw.len())
    }
}
