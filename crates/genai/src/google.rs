//! Google Gemini API Implementation
//!
//! Calls the Gemini `generateContent` endpoint
//! (https://generativelanguage.googleapis.com/v1beta/models/...) using
//! reqwest. Image synthesis asks for the IMAGE response modality and
//! returns the inline payload as a data URI.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{GenAiConfig, GenAiError, PromptService, SynthesisService};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const REFINE_INSTRUCTION: &str = "You are an expert AI prompt engineer specializing in creating \
effective prompts for ad banner image generation. Take the user-provided prompt and enhance it: \
more detailed and specific, optimized for visual output (suggest colors, styles, moods, or \
objects if appropriate), action-oriented and clear for an image generation model, creative and \
engaging, and concise enough for models with input length restrictions. Return only the improved \
prompt text.";

const SUGGEST_INSTRUCTION: &str = "You are a creative marketing assistant helping users generate \
banner images. Provide a list of 4 distinct prompt suggestions that users can use to generate \
banner images. Be creative and specific enough to yield good results. Output the prompt \
suggestions as a JSON array of strings.";

/// Gemini generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(
        rename = "inlineData",
        skip_serializing_if = "Option::is_none",
        default
    )]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    /// Base64-encoded payload
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

/// Gemini generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Gemini API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    status: String,
    message: String,
}

/// Google GenAI service implementing both synthesis and prompt seams
pub struct GoogleGenAiService {
    client: Client,
    config: GenAiConfig,
    base_url: String,
}

impl GoogleGenAiService {
    pub fn new(config: GenAiConfig) -> Self {
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

    async fn generate(
        &self,
        model: &str,
        body: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        tracing::debug!(model = %model, "Sending Gemini API request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenAiError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GenAiError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            // Try to parse as API error
            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(GenAiError::Response(format!(
                    "Gemini API error ({}): {}",
                    error_response.error.status, error_response.error.message
                )));
            }

            return Err(GenAiError::Response(format!(
                "Gemini API returned {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GenAiError::Response(format!("Failed to parse response: {}", e)))
    }

    /// Join the text parts of the first candidate
    fn extract_text(response: &GenerateContentResponse) -> String {
        response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    fn user_content(text: &str) -> Content {
        Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }

    fn system_content(text: &str) -> Content {
        Content {
            role: None,
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

#[async_trait::async_trait]
impl SynthesisService for GoogleGenAiService {
    async fn synthesize(&self, prompt: &str) -> Result<String, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![Self::user_content(prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                response_mime_type: None,
            }),
        };

        let response = self.generate(&self.config.image_model, body).await?;

        // The first inline image part is the generated banner
        let image = response
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.inline_data.as_ref()))
            .ok_or(GenAiError::EmptyResponse)?;

        Ok(format!("data:{};base64,{}", image.mime_type, image.data))
    }
}

#[async_trait::async_trait]
impl PromptService for GoogleGenAiService {
    async fn refine(&self, prompt: &str) -> Result<String, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![Self::user_content(prompt)],
            system_instruction: Some(Self::system_content(REFINE_INSTRUCTION)),
            generation_config: None,
        };

        let response = self.generate(&self.config.text_model, body).await?;

        let refined = Self::extract_text(&response).trim().to_string();
        if refined.is_empty() {
            return Err(GenAiError::EmptyResponse);
        }

        Ok(refined)
    }

    async fn suggest(&self) -> Result<Vec<String>, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![Self::user_content("Suggest banner image prompts.")],
            system_instruction: Some(Self::system_content(SUGGEST_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                response_modalities: None,
                response_mime_type: Some("application/json".to_string()),
            }),
        };

        let response = self.generate(&self.config.text_model, body).await?;

        let text = Self::extract_text(&response);
        let suggestions: Vec<String> = serde_json::from_str(text.trim())
            .map_err(|e| GenAiError::Response(format!("Failed to parse suggestions: {}", e)))?;

        if suggestions.is_empty() {
            return Err(GenAiError::EmptyResponse);
        }

        Ok(suggestions)
    }
}
