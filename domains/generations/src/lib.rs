//! Generations domain: prompt-to-banner workflow, history, notifications

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    GenerationOutcome, GenerationWarning, IMAGES_PER_GENERATION, MAX_HISTORY_ITEMS,
    MAX_PROMPT_CHARS, MIN_PROMPT_CHARS, STORAGE_NAMESPACE,
};
pub use domain::notify::{HistoryChanged, HistoryNotifier};
pub use domain::workflow::GenerationWorkflow;

// Re-export API types
pub use api::routes;
pub use api::GenerationsState;
