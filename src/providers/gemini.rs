use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::Client;
use url::Url;
use log::{debug, error};

use crate::errors::ProviderError;
use super::{CompletionRequest, CompletionResponse, Provider};

/// Public Generative Language API host
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini client for the `generateContent` API
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, normalised to end with an API version segment
    endpoint: Url,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns
    contents: Vec<GeminiContent>,

    /// Sampling parameters
    generation_config: GenerationConfig,
}

/// One conversation turn
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the sender (user, model)
    #[serde(default)]
    pub role: String,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// Sampling parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    temperature: f32,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,

    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,

    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A generated candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u64>,

    #[serde(default)]
    pub candidates_token_count: Option<u64>,
}

/// Why a prompt was refused
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl GeminiRequest {
    /// Single-turn user prompt
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: prompt.into() }],
            }],
            generation_config: GenerationConfig { temperature },
        }
    }
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> Result<String, ProviderError> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref()) {
            return Err(ProviderError::ParseError(format!("Prompt was blocked: {}", reason)));
        }

        let candidate = self.candidates.first()
            .ok_or_else(|| ProviderError::ParseError("Response contained no candidates".to_string()))?;

        let text: String = candidate.content.iter()
            .flat_map(|c| c.parts.iter())
            .map(|p| p.text.as_str())
            .collect();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(ProviderError::ParseError(format!("Response contained no text (finish reason: {})", reason)));
        }

        Ok(text)
    }
}

/// Map a non-success HTTP response to a provider error
pub fn error_from_status(status: u16, body: &str) -> ProviderError {
    let parsed = serde_json::from_str::<GeminiErrorEnvelope>(body).ok();
    let message = parsed.as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let invalid_key = parsed.as_ref().is_some_and(|e| {
        e.error.details.iter().any(|d| d.to_string().contains("API_KEY_INVALID"))
            || e.error.status == "PERMISSION_DENIED"
            || e.error.status == "UNAUTHENTICATED"
    }) || body.contains("API_KEY_INVALID");

    match status {
        401 | 403 => ProviderError::AuthenticationError(message),
        400 if invalid_key => ProviderError::AuthenticationError(message),
        429 => ProviderError::RateLimitExceeded(message),
        _ => ProviderError::ApiError { status_code: status, message },
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let endpoint = Self::normalize_endpoint(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    /// Accept both a bare host and a versioned base URL
    fn normalize_endpoint(endpoint: &str) -> Result<Url, ProviderError> {
        let trimmed = endpoint.trim().trim_end_matches('/');
        let base = if trimmed.is_empty() { DEFAULT_GEMINI_ENDPOINT } else { trimmed };
        let versioned = if base.ends_with("/v1beta") || base.ends_with("/v1") {
            format!("{}/", base)
        } else {
            format!("{}/v1beta/", base)
        };

        Url::parse(&versioned)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", endpoint, e)))
    }

    /// URL of the generateContent method for a model
    pub fn generate_url(&self, model: &str) -> Result<Url, ProviderError> {
        let model = model.trim().trim_start_matches("models/");
        if model.is_empty() {
            return Err(ProviderError::RequestFailed("Model name is empty".to_string()));
        }

        self.endpoint
            .join(&format!("models/{}:generateContent", model))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid model name '{}': {}", model, e)))
    }

    fn classify_transport_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else if e.is_connect() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        if request.api_key.is_empty() {
            return Err(ProviderError::AuthenticationError("API key is empty".to_string()));
        }

        let url = self.generate_url(&request.model)?;
        let body = GeminiRequest::new(request.prompt, request.temperature);

        debug!("Sending generateContent request for model {}", request.model);

        let response = self.client.post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", request.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(Self::classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(error_from_status(status.as_u16(), &error_text));
        }

        let gemini_response = response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let usage = gemini_response.usage_metadata.as_ref();
        Ok(CompletionResponse {
            text: gemini_response.text()?,
            prompt_tokens: usage.and_then(|u| u.prompt_token_count),
            completion_tokens: usage.and_then(|u| u.candidates_token_count),
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
