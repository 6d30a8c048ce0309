//! AdAlchemy Generative AI Services
//!
//! Wraps the hosted generative model endpoint behind two seams:
//! - `SynthesisService`: one banner image (as a data URI) per call
//! - `PromptService`: prompt refinement and prompt suggestions
//!
//! Provides a Google Gemini implementation for production and
//! programmable mocks for testing and development.

pub mod google;
pub mod mock;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenAiError {
    #[error("GenAI configuration error: {0}")]
    Configuration(String),

    #[error("GenAI request error: {0}")]
    Request(String),

    #[error("GenAI response error: {0}")]
    Response(String),

    #[error("GenAI rate limit exceeded")]
    RateLimit,

    #[error("The model returned no content")]
    EmptyResponse,
}

/// GenAI service configuration
#[derive(Clone)]
pub struct GenAiConfig {
    /// Provider (google, mock)
    pub provider: String,
    /// API key for the model endpoint
    pub api_key: String,
    /// Model used for image synthesis
    pub image_model: String,
    /// Model used for prompt refinement and suggestions
    pub text_model: String,
    /// Override for the API base URL (tests)
    pub base_url: Option<String>,
}

impl std::fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GenAiConfig {
    /// Create GenAI config from environment variables
    pub fn from_env() -> Result<Self, GenAiError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("GENAI_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let api_key = std::env::var("GENAI_API_KEY").unwrap_or_default();
        let image_model = std::env::var("GENAI_IMAGE_MODEL")
            .unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string());
        let text_model =
            std::env::var("GENAI_TEXT_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let base_url = std::env::var("GENAI_BASE_URL").ok();

        if provider != "mock" && api_key.is_empty() {
            return Err(GenAiError::Configuration(
                "GENAI_API_KEY is required for the google provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            image_model,
            text_model,
            base_url,
        })
    }
}

/// Image Synthesis Service: text prompt in, one data-URI image out.
///
/// Every call is independent and attempted exactly once; there is no
/// retry policy anywhere in the flow.
#[async_trait::async_trait]
pub trait SynthesisService: Send + Sync {
    async fn synthesize(&self, prompt: &str) -> Result<String, GenAiError>;
}

/// Prompt Refinement Service: rewrite a prompt, or suggest fresh ones
#[async_trait::async_trait]
pub trait PromptService: Send + Sync {
    /// Return a rewritten, more detailed prompt
    async fn refine(&self, prompt: &str) -> Result<String, GenAiError>;

    /// Return four prompt suggestions to kickstart the creative process
    async fn suggest(&self) -> Result<Vec<String>, GenAiError>;
}

/// Factory for creating GenAI service implementations
pub struct GenAiServiceFactory;

impl GenAiServiceFactory {
    pub fn create_synthesis(
        config: GenAiConfig,
    ) -> Result<Box<dyn SynthesisService>, GenAiError> {
        match config.provider.as_str() {
            "google" => {
                tracing::info!(model = %config.image_model, "Creating Google synthesis service");
                Ok(Box::new(google::GoogleGenAiService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock synthesis service");
                Ok(Box::new(mock::MockSynthesisService::new()))
            }
            provider => Err(GenAiError::Configuration(format!(
                "Unknown GenAI provider: {}. Supported providers: google, mock",
                provider
            ))),
        }
    }

    pub fn create_prompt(config: GenAiConfig) -> Result<Box<dyn PromptService>, GenAiError> {
        match config.provider.as_str() {
            "google" => {
                tracing::info!(model = %config.text_model, "Creating Google prompt service");
                Ok(Box::new(google::GoogleGenAiService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock prompt service");
                Ok(Box::new(mock::MockPromptService::new()))
            }
            provider => Err(GenAiError::Configuration(format!(
                "Unknown GenAI provider: {}. Supported providers: google, mock",
                provider
            ))),
        }
    }
}
