//! Prompt assistance API handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use adalchemy_auth::AuthUser;
use adalchemy_common::{Result, ValidatedJson};

use crate::api::middleware::GenerationsState;

/// Request for refining a prompt
#[derive(Debug, Deserialize, Validate)]
pub struct RefinePromptRequest {
    #[validate(length(
        min = 10,
        max = 500,
        message = "Prompt must be between 10 and 500 characters"
    ))]
    pub prompt: String,
}

/// Refined prompt response DTO
#[derive(Debug, Serialize)]
pub struct RefinePromptResponse {
    pub refined_prompt: String,
}

/// Prompt suggestions response DTO
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Rewrite the caller's prompt into a more detailed one
pub async fn refine_prompt(
    AuthUser(_principal): AuthUser,
    State(state): State<GenerationsState>,
    ValidatedJson(request): ValidatedJson<RefinePromptRequest>,
) -> Result<Json<RefinePromptResponse>> {
    let refined_prompt = state.workflow.refine_prompt(&request.prompt).await?;

    Ok(Json(RefinePromptResponse { refined_prompt }))
}

/// Fetch starter prompt suggestions
pub async fn list_suggestions(
    AuthUser(_principal): AuthUser,
    State(state): State<GenerationsState>,
) -> Result<Json<SuggestionsResponse>> {
    let suggestions = state.workflow.suggest_prompts().await?;

    Ok(Json(SuggestionsResponse { suggestions }))
}
