/*!
 * Core translation service implementation.
 *
 * `TranslationService` wires the configuration and a provider into the
 * streaming pipeline and the retry path. It holds no per-request state and
 * can serve several independent requests at once.
 */

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app_config::{Config, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, RetryError};
use crate::providers::gemini::Gemini;
use crate::providers::{ApiKey, Provider};
use super::chunk::{ChunkTranslator, TranslationRequestContext};
use super::events::TranslationEvent;
use super::pipeline::{PipelineReport, TranslationPipeline};
use super::retry;

/// Events buffered between the pipeline and a slow consumer
const EVENT_BUFFER: usize = 16;

/// Entry point for translation requests
#[derive(Debug, Clone)]
pub struct TranslationService {
    pipeline: Arc<TranslationPipeline>,
    translator: ChunkTranslator,
    provider: Arc<dyn Provider>,
}

impl TranslationService {
    /// Create a service over an explicit provider
    pub fn new(config: &Config, provider: Arc<dyn Provider>) -> Self {
        let translator = ChunkTranslator::new(
            Arc::clone(&provider),
            config.translation.temperature,
            config.translation.timeout(),
        );
        let pipeline = TranslationPipeline::new(translator.clone(), config.pipeline_settings());

        Self {
            pipeline: Arc::new(pipeline),
            translator,
            provider,
        }
    }

    /// Create a service using the provider named in the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider: Arc<dyn Provider> = match config.translation.provider {
            ConfigTranslationProvider::Gemini => Arc::new(Gemini::new(
                &config.translation.endpoint,
                config.translation.timeout(),
            )?),
        };

        Ok(Self::new(config, provider))
    }

    /// Start a streaming translation of `source`.
    ///
    /// Events arrive on the returned receiver; dropping it cancels the job.
    pub fn translate_file(
        &self,
        source: PathBuf,
        request: TranslationRequestContext,
    ) -> (mpsc::Receiver<TranslationEvent>, JoinHandle<PipelineReport>) {
        Arc::clone(&self.pipeline).spawn(source, request, EVENT_BUFFER)
    }

    /// Translate one block again, synchronously
    pub async fn retry_chunk(
        &self,
        original_text: &str,
        request: &TranslationRequestContext,
    ) -> Result<String, RetryError> {
        retry::retry_chunk(
            &self.translator,
            &self.pipeline.settings().dictionary_path,
            original_text,
            request,
        )
        .await
    }

    /// Check that the provider accepts the credentials and model
    pub async fn test_connection(&self, api_key: &ApiKey, model: &str) -> Result<(), ProviderError> {
        self.provider.test_connection(api_key, model).await
    }
}
