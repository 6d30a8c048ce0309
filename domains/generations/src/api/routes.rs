//! Route definitions for Generations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{generations, history, prompts};
use super::middleware::GenerationsState;

/// Create all Generations domain API routes
pub fn routes() -> Router<GenerationsState> {
    Router::new()
        .route("/v1/generations", post(generations::create_generation))
        .route("/v1/history", get(history::list_history))
        .route("/v1/history/events", get(history::history_events))
        .route("/v1/prompts/refine", post(prompts::refine_prompt))
        .route("/v1/prompts/suggestions", get(prompts::list_suggestions))
}
