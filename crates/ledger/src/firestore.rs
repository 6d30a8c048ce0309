//! Firestore implementation
//!
//! Appends via `documents:commit` so `createdAt` is assigned by the
//! server (REQUEST_TIME transform), and reads via `documents:runQuery`
//! with an owner filter, createdAt-descending order, and a limit.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{HistoryEntry, HistoryLedger, LedgerConfig, LedgerError, NewHistoryEntry};

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";

/// Firestore history ledger
pub struct FirestoreLedger {
    client: Client,
    config: LedgerConfig,
    base_url: String,
}

impl FirestoreLedger {
    pub fn new(config: LedgerConfig) -> Self {
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

    fn database_path(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.config.project_id
        )
    }

    fn document_name(&self, doc_id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), self.config.collection, doc_id)
    }

    /// Encode a record as Firestore typed fields
    fn encode_fields(entry: &NewHistoryEntry) -> Value {
        let urls: Vec<Value> = entry
            .image_urls
            .iter()
            .map(|u| json!({ "stringValue": u }))
            .collect();

        json!({
            "userId": { "stringValue": entry.user_id },
            "userEmail": { "stringValue": entry.user_email },
            "prompt": { "stringValue": entry.prompt },
            "imageUrls": { "arrayValue": { "values": urls } },
        })
    }

    fn string_field(fields: &Value, name: &str) -> String {
        fields[name]["stringValue"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, LedgerError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| LedgerError::Response(format!("Invalid timestamp {}: {}", raw, e)))
    }

    /// Decode one Firestore document into a history entry
    fn decode_document(document: &Value) -> Result<HistoryEntry, LedgerError> {
        let name = document["name"].as_str().unwrap_or_default();
        let id = name.rsplit('/').next().unwrap_or_default().to_string();
        let fields = &document["fields"];

        let image_urls = fields["imageUrls"]["arrayValue"]["values"]
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v["stringValue"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let created_at = fields["createdAt"]["timestampValue"]
            .as_str()
            .map(Self::parse_timestamp)
            .transpose()?
            .ok_or_else(|| LedgerError::Response("Document missing createdAt".to_string()))?;

        Ok(HistoryEntry {
            id,
            user_id: Self::string_field(fields, "userId"),
            user_email: Self::string_field(fields, "userEmail"),
            prompt: Self::string_field(fields, "prompt"),
            image_urls,
            created_at,
        })
    }

    async fn post(&self, url: &str, body: Value) -> Result<Value, LedgerError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            return Err(LedgerError::Response(format!(
                "Firestore returned {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LedgerError::Response(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait::async_trait]
impl HistoryLedger for FirestoreLedger {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, LedgerError> {
        let doc_id = Uuid::new_v4().simple().to_string();
        let url = format!("{}/v1/{}:commit", self.base_url, self.database_path());

        // One write: the document plus a REQUEST_TIME transform so the
        // creation timestamp is server-assigned.
        let body = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(&doc_id),
                    "fields": Self::encode_fields(&entry),
                },
                "updateTransforms": [{
                    "fieldPath": "createdAt",
                    "setToServerValue": "REQUEST_TIME",
                }],
            }],
        });

        tracing::debug!(doc_id = %doc_id, user_id = %entry.user_id, "Appending history entry");

        let response = self.post(&url, body).await?;

        let created_at_raw = response["writeResults"][0]["transformResults"][0]["timestampValue"]
            .as_str()
            .or_else(|| response["commitTime"].as_str())
            .ok_or_else(|| {
                LedgerError::Response("Commit response missing timestamp".to_string())
            })?;

        Ok(HistoryEntry {
            id: doc_id,
            user_id: entry.user_id,
            user_email: entry.user_email,
            prompt: entry.prompt,
            image_urls: entry.image_urls,
            created_at: Self::parse_timestamp(created_at_raw)?,
        })
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, LedgerError> {
        let url = format!("{}/v1/{}:runQuery", self.base_url, self.database_path());

        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.config.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": { "stringValue": user_id },
                    }
                },
                "orderBy": [{
                    "field": { "fieldPath": "createdAt" },
                    "direction": "DESCENDING",
                }],
                "limit": limit,
            }
        });

        let response = self.post(&url, body).await?;

        // runQuery returns an array; entries without a `document` key
        // are read-time markers.
        let results = response
            .as_array()
            .ok_or_else(|| LedgerError::Response("Expected query result array".to_string()))?;

        results
            .iter()
            .filter(|r| r.get("document").is_some())
            .map(|r| Self::decode_document(&r["document"]))
            .collect()
    }
}
