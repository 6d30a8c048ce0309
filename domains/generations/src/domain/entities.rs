//! Domain entities for the Generations domain

use adalchemy_ledger::HistoryEntry;
use serde::{Deserialize, Serialize};

/// Minimum prompt length (characters)
pub const MIN_PROMPT_CHARS: usize = 10;

/// Maximum prompt length (characters)
pub const MAX_PROMPT_CHARS: usize = 500;

/// Synthesis calls per generation request
pub const IMAGES_PER_GENERATION: usize = 4;

/// Storage path namespace for generated banners
pub const STORAGE_NAMESPACE: &str = "user_generations";

/// Hard upper bound on history reads
pub const MAX_HISTORY_ITEMS: i64 = 20;

/// Soft diagnostic attached to a successful generation.
///
/// Indices refer to the synthesis call order (0..3); a warning for
/// index `i` means image `i` is missing from the saved entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// The synthesis call failed outright
    SynthesisFailed { index: usize, detail: String },
    /// The synthesis call returned something that is not a valid image
    InvalidImage { index: usize },
    /// The image was valid but its upload failed
    UploadFailed { index: usize, detail: String },
}

impl GenerationWarning {
    pub fn index(&self) -> usize {
        match self {
            GenerationWarning::SynthesisFailed { index, .. }
            | GenerationWarning::InvalidImage { index }
            | GenerationWarning::UploadFailed { index, .. } => *index,
        }
    }
}

/// Result of a completed `generate_and_save`: the persisted entry plus
/// any non-fatal diagnostics gathered along the way.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub entry: HistoryEntry,
    pub warnings: Vec<GenerationWarning>,
}
