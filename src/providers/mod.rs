/*!
 * Provider implementations for the external language model.
 *
 * The rest of the crate treats the model as an opaque capability: it sends a
 * prompt and gets text back, or a classified error.
 * - Gemini: Google Generative Language API
 * - Mock: configurable in-process provider for tests
 */

use async_trait::async_trait;
use std::fmt::{self, Debug};

use crate::errors::ProviderError;

/// API credential supplied per request.
///
/// The key is never printed: `Debug` redacts it and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the HTTP layer only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// A single generation call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Credential for this call
    pub api_key: ApiKey,
    /// Model name
    pub model: String,
    /// Fully built prompt
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// Text returned by the provider
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text, untrimmed
    pub text: String,
    /// Prompt tokens reported by the provider
    pub prompt_tokens: Option<u64>,
    /// Completion tokens reported by the provider
    pub completion_tokens: Option<u64>,
}

/// Common trait for all model providers
///
/// Implementations are shared between concurrent requests, so they hold no
/// per-request state; credentials travel inside each request.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Test the connection and credentials with a minimal request
    async fn test_connection(&self, api_key: &ApiKey, model: &str) -> Result<(), ProviderError> {
        self.complete(CompletionRequest {
            api_key: api_key.clone(),
            model: model.to_string(),
            prompt: "Hello".to_string(),
            temperature: 0.0,
        })
        .await
        .map(|_| ())
    }

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}

pub mod gemini;
pub mod mock;
