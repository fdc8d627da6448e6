/*!
 * Single-block translation.
 *
 * `ChunkTranslator` turns one block's text into translated text through the
 * configured provider. It never retries on its own; retrying is a decision
 * left to the caller.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, warn};

use crate::dictionary::Dictionary;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{ApiKey, CompletionRequest, Provider};
use super::prompts::{build_translation_prompt, PromptTemplate};

/// Per-request inputs. Never persisted and never logged.
#[derive(Debug, Clone)]
pub struct TranslationRequestContext {
    /// Credential for the model provider
    pub api_key: ApiKey,
    /// Model name
    pub model_name: String,
    /// Template containing the `{chunk}` placeholder
    pub prompt_template: PromptTemplate,
}

impl TranslationRequestContext {
    pub fn new(api_key: ApiKey, model_name: impl Into<String>, prompt_template: PromptTemplate) -> Self {
        Self {
            api_key,
            model_name: model_name.into(),
            prompt_template,
        }
    }
}

/// Translates one block of text at a time
#[derive(Debug, Clone)]
pub struct ChunkTranslator {
    /// Model capability
    provider: Arc<dyn Provider>,
    /// Sampling temperature
    temperature: f32,
    /// Upper bound for one provider call
    timeout: Duration,
}

impl ChunkTranslator {
    /// Create a translator around a provider
    pub fn new(provider: Arc<dyn Provider>, temperature: f32, timeout: Duration) -> Self {
        Self {
            provider,
            temperature,
            timeout,
        }
    }

    /// Translate one block's text.
    ///
    /// The prompt is the rendered template plus the dictionary directive; the
    /// provider's answer is returned trimmed. A blank answer yields an empty
    /// string.
    pub async fn translate_chunk(
        &self,
        original_text: &str,
        request: &TranslationRequestContext,
        dictionary: &Dictionary,
    ) -> Result<String, TranslationError> {
        let prompt = build_translation_prompt(&request.prompt_template, original_text, dictionary);
        let completion = CompletionRequest {
            api_key: request.api_key.clone(),
            model: request.model_name.clone(),
            prompt,
            temperature: self.temperature,
        };

        let start = Instant::now();
        let response = match tokio::time::timeout(self.timeout, self.provider.complete(completion)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "No response from {} within {} seconds",
                self.provider.name(),
                self.timeout.as_secs()
            ))),
        };

        let response = response.map_err(|e| {
            error!("{} request failed: {}", self.provider.name(), e);
            TranslationError::from(e)
        })?;

        debug!(
            "{} answered in {:?} (prompt tokens: {:?}, completion tokens: {:?})",
            self.provider.name(),
            start.elapsed(),
            response.prompt_tokens,
            response.completion_tokens
        );

        let translated = response.text.trim();
        if translated.is_empty() {
            warn!("{} returned a blank translation", self.provider.name());
        }

        Ok(translated.to_string())
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}
