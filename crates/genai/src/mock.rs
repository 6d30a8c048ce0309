//! Mock GenAI services
//!
//! Programmable mocks used by the factories when provider is `"mock"`.
//! `MockSynthesisService` pops a queued outcome per call (defaulting to
//! a valid tiny PNG) and counts calls so tests can assert exactly how
//! many synthesis requests a workflow issued.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{GenAiError, PromptService, SynthesisService};

/// 1x1 transparent PNG, valid base64
pub const MOCK_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Outcome of a single mock synthesis call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MockSynthesisOutcome {
    /// A valid data-URI image
    #[default]
    Image,
    /// A syntactically invalid result (not a data URI)
    InvalidPayload,
    /// A failed call
    Fail,
}

/// Mock synthesis service with a programmable outcome queue
#[derive(Default)]
pub struct MockSynthesisService {
    outcomes: Mutex<VecDeque<MockSynthesisOutcome>>,
    calls: AtomicUsize,
}

impl MockSynthesisService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for upcoming calls; once drained, calls succeed
    pub fn push_outcomes(&self, outcomes: impl IntoIterator<Item = MockSynthesisOutcome>) {
        self.outcomes.lock().unwrap().extend(outcomes);
    }

    /// Number of synthesize calls issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SynthesisService for MockSynthesisService {
    async fn synthesize(&self, _prompt: &str) -> Result<String, GenAiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();

        tracing::debug!(?outcome, "Mock synthesis call");

        match outcome {
            MockSynthesisOutcome::Image => Ok(MOCK_IMAGE_DATA_URI.to_string()),
            MockSynthesisOutcome::InvalidPayload => Ok("not-an-image".to_string()),
            MockSynthesisOutcome::Fail => {
                Err(GenAiError::Response("mock synthesis failure".to_string()))
            }
        }
    }
}

/// Mock prompt service with deterministic responses
#[derive(Default)]
pub struct MockPromptService {
    refine_calls: AtomicUsize,
    fail_refine: AtomicBool,
    empty_refine: AtomicBool,
}

impl MockPromptService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of refine calls issued so far
    pub fn refine_calls(&self) -> usize {
        self.refine_calls.load(Ordering::SeqCst)
    }

    /// Make the next refine calls fail
    pub fn set_fail_refine(&self, fail: bool) {
        self.fail_refine.store(fail, Ordering::SeqCst);
    }

    /// Make the next refine calls return no content
    pub fn set_empty_refine(&self, empty: bool) {
        self.empty_refine.store(empty, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PromptService for MockPromptService {
    async fn refine(&self, prompt: &str) -> Result<String, GenAiError> {
        self.refine_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_refine.load(Ordering::SeqCst) {
            return Err(GenAiError::Response("mock refinement failure".to_string()));
        }
        if self.empty_refine.load(Ordering::SeqCst) {
            return Err(GenAiError::EmptyResponse);
        }

        Ok(format!(
            "{}, with vivid colors, bold typography, and a clear focal point",
            prompt
        ))
    }

    async fn suggest(&self) -> Result<Vec<String>, GenAiError> {
        Ok(vec![
            "A vibrant summer sale banner with sneakers and lush green leaves".to_string(),
            "A minimalist tech product launch banner in deep blue tones".to_string(),
            "A cozy autumn coffee promotion with warm amber lighting".to_string(),
            "A bold fitness membership banner with dynamic motion streaks".to_string(),
        ])
    }
}
