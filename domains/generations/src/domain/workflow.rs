//! Generation Workflow
//!
//! Orchestrates one user-submitted prompt into up to four persisted,
//! retrievable banner images with best-effort partial success:
//! synthesize four images, validate, upload the valid ones, append one
//! history entry, notify subscribers. Every external call is attempted
//! exactly once; there is no retry policy anywhere in the flow.

use std::sync::Arc;

use chrono::Utc;

use adalchemy_auth::Principal;
use adalchemy_common::{DataUri, Error, Result};
use adalchemy_genai::{PromptService, SynthesisService};
use adalchemy_ledger::{HistoryEntry, HistoryLedger, NewHistoryEntry};
use adalchemy_storage::ArtifactStore;

use crate::domain::entities::{
    GenerationOutcome, GenerationWarning, IMAGES_PER_GENERATION, MAX_HISTORY_ITEMS,
    MAX_PROMPT_CHARS, MIN_PROMPT_CHARS, STORAGE_NAMESPACE,
};
use crate::domain::notify::{HistoryChanged, HistoryNotifier};

/// The one internal component with sequencing logic: everything else
/// is a thin client over a managed service.
pub struct GenerationWorkflow {
    synthesis: Arc<dyn SynthesisService>,
    prompts: Arc<dyn PromptService>,
    store: Arc<dyn ArtifactStore>,
    ledger: Arc<dyn HistoryLedger>,
    notifier: HistoryNotifier,
}

impl GenerationWorkflow {
    pub fn new(
        synthesis: Arc<dyn SynthesisService>,
        prompts: Arc<dyn PromptService>,
        store: Arc<dyn ArtifactStore>,
        ledger: Arc<dyn HistoryLedger>,
        notifier: HistoryNotifier,
    ) -> Self {
        Self {
            synthesis,
            prompts,
            store,
            ledger,
            notifier,
        }
    }

    fn validate_prompt_length(prompt: &str) -> Result<()> {
        let len = prompt.chars().count();
        if len < MIN_PROMPT_CHARS || len > MAX_PROMPT_CHARS {
            return Err(Error::Validation(format!(
                "Prompt must be between {} and {} characters (got {})",
                MIN_PROMPT_CHARS, MAX_PROMPT_CHARS, len
            )));
        }
        Ok(())
    }

    /// Turn one prompt into up to four persisted images.
    ///
    /// Partial synthesis/upload failure is non-fatal and surfaced as
    /// warnings; the saved entry's URL list always follows synthesis
    /// index order. If nothing could be persisted the whole operation
    /// fails and no ledger record is written.
    pub async fn generate_and_save(
        &self,
        principal: &Principal,
        prompt: &str,
    ) -> Result<GenerationOutcome> {
        if principal.email.is_empty() {
            return Err(Error::Authentication(
                "Signed-in user has no email; cannot record history".to_string(),
            ));
        }
        Self::validate_prompt_length(prompt)?;

        let mut warnings = Vec::new();

        // Steps 1 and 2: synthesize four images sequentially, keeping only
        // syntactically valid data URIs, tagged with their call index.
        let mut images: Vec<(usize, DataUri)> = Vec::with_capacity(IMAGES_PER_GENERATION);
        for index in 0..IMAGES_PER_GENERATION {
            match self.synthesis.synthesize(prompt).await {
                Ok(raw) => match DataUri::parse(&raw) {
                    Ok(image) => images.push((index, image)),
                    Err(_) => {
                        tracing::warn!(index, "Discarding invalid image payload");
                        warnings.push(GenerationWarning::InvalidImage { index });
                    }
                },
                Err(e) => {
                    tracing::warn!(index, error = %e, "Synthesis call failed");
                    warnings.push(GenerationWarning::SynthesisFailed {
                        index,
                        detail: e.to_string(),
                    });
                }
            }
        }

        if images.is_empty() {
            return Err(Error::Synthesis(format!(
                "All {} synthesis calls failed or returned invalid images",
                IMAGES_PER_GENERATION
            )));
        }

        // Step 3: upload valid images; URL order follows image index
        // because iteration does, regardless of per-upload outcome.
        let timestamp = Utc::now().timestamp_millis();
        let mut image_urls = Vec::with_capacity(images.len());
        for (index, image) in &images {
            let path = format!(
                "{}/{}/{}/banner_{}.png",
                STORAGE_NAMESPACE, principal.uid, timestamp, index
            );
            match self.store.upload(&path, image).await {
                Ok(url) => image_urls.push(url),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Image upload failed");
                    warnings.push(GenerationWarning::UploadFailed {
                        index: *index,
                        detail: e.to_string(),
                    });
                }
            }
        }

        if image_urls.is_empty() {
            return Err(Error::Upload("No images persisted".to_string()));
        }

        // Step 4: append exactly one immutable record. A failure here
        // leaves the already-uploaded blobs orphaned; there is no
        // compensating delete.
        let entry = self
            .ledger
            .append(NewHistoryEntry {
                user_id: principal.uid.clone(),
                user_email: principal.email.clone(),
                prompt: prompt.to_string(),
                image_urls,
            })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %principal.uid, "Ledger append failed; uploaded blobs remain orphaned");
                Error::Persistence(e.to_string())
            })?;

        // Step 5: one notification per successful save
        self.notifier.notify(HistoryChanged {
            user_id: entry.user_id.clone(),
            entry_id: entry.id.clone(),
        });

        tracing::info!(
            user_id = %entry.user_id,
            entry_id = %entry.id,
            images = entry.image_urls.len(),
            warnings = warnings.len(),
            "Generation recorded"
        );

        Ok(GenerationOutcome { entry, warnings })
    }

    /// Rewrite a prompt through the refinement service.
    ///
    /// Exactly one service call; no retries, no caching.
    pub async fn refine_prompt(&self, prompt: &str) -> Result<String> {
        if prompt.chars().count() < MIN_PROMPT_CHARS {
            return Err(Error::Validation(format!(
                "Prompt must be at least {} characters to refine",
                MIN_PROMPT_CHARS
            )));
        }

        self.prompts.refine(prompt).await.map_err(|e| match e {
            adalchemy_genai::GenAiError::EmptyResponse => {
                Error::Refinement("Service returned no content".to_string())
            }
            e => Error::Refinement(e.to_string()),
        })
    }

    /// Fetch prompt suggestions to kickstart the creative process
    pub async fn suggest_prompts(&self) -> Result<Vec<String>> {
        self.prompts
            .suggest()
            .await
            .map_err(|e| Error::Refinement(e.to_string()))
    }

    /// Owner-scoped history read, newest first, capped at 20 entries
    pub async fn list_recent(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<HistoryEntry>> {
        let limit = limit.unwrap_or(MAX_HISTORY_ITEMS).clamp(1, MAX_HISTORY_ITEMS);
        self.ledger
            .list_recent(user_id, limit)
            .await
            .map_err(|e| Error::Persistence(e.to_string()))
    }
}
