//! Banner generation API handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use adalchemy_auth::AuthUser;
use adalchemy_common::{Result, ValidatedJson};
use adalchemy_ledger::HistoryEntry;

use crate::api::middleware::GenerationsState;
use crate::domain::entities::{GenerationOutcome, GenerationWarning};

/// Request for creating a generation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGenerationRequest {
    #[validate(length(
        min = 10,
        max = 500,
        message = "Prompt must be between 10 and 500 characters"
    ))]
    pub prompt: String,
}

/// History entry response DTO
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: String,
    pub prompt: String,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            prompt: entry.prompt,
            image_urls: entry.image_urls,
            created_at: entry.created_at,
        }
    }
}

/// Generation response DTO
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub entry: HistoryEntryResponse,
    pub warnings: Vec<GenerationWarning>,
}

impl From<GenerationOutcome> for GenerationResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            entry: outcome.entry.into(),
            warnings: outcome.warnings,
        }
    }
}

/// Create a generation: synthesize, persist, and record banners for a prompt
pub async fn create_generation(
    AuthUser(principal): AuthUser,
    State(state): State<GenerationsState>,
    ValidatedJson(request): ValidatedJson<CreateGenerationRequest>,
) -> Result<(StatusCode, Json<GenerationResponse>)> {
    let outcome = state
        .workflow
        .generate_and_save(&principal, &request.prompt)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}
