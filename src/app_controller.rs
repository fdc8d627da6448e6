use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::dictionary::Dictionary;
use crate::file_utils::FileManager;
use crate::providers::{ApiKey, Provider};
use crate::subtitle_processor;
use crate::translation::events::RetryResponse;
use crate::translation::{
    PipelineReport, PromptTemplate, TranslationEvent, TranslationRequestContext, TranslationService,
};

// @module: Application controller driving translations from the command line

/// How events are written to the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFraming {
    // @variant: One JSON object per line
    #[default]
    JsonLines,
    // @variant: Server-sent events, `data: {json}` followed by a blank line
    Sse,
}

impl EventFraming {
    // @returns: Event encoded as one complete frame
    pub fn frame(&self, event: &TranslationEvent) -> String {
        match self {
            Self::JsonLines => format!("{}\n", event.to_json()),
            Self::Sse => format!("data: {}\n\n", event.to_json()),
        }
    }
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation entry point
    service: TranslationService,
}

impl Controller {
    // @method: Create a controller with the provider named in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::from_config(&config)?;
        Ok(Self { config, service })
    }

    // @method: Create a controller over an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        let service = TranslationService::new(&config, provider);
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the per-request inputs, falling back to the configured model
    /// and prompt when no override is given
    pub fn request_context(
        &self,
        api_key: ApiKey,
        model: Option<String>,
        prompt_file: Option<&Path>,
    ) -> Result<TranslationRequestContext> {
        if api_key.is_empty() {
            return Err(anyhow!("An API key is required (use --api-key or GEMINI_API_KEY)"));
        }

        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.config.translation.model.clone());

        let prompt_template = match prompt_file {
            Some(path) => {
                let template = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;
                PromptTemplate::new(template)
            }
            None => self.config.translation.default_prompt(),
        };

        if !prompt_template.has_placeholder() {
            warn!("Prompt template has no {{chunk}} placeholder, subtitle text will not reach the model");
        }

        Ok(TranslationRequestContext::new(api_key, model, prompt_template))
    }

    /// Stage `input_file`, translate it and write every event to `out`.
    ///
    /// Returns the pipeline report; a job that ended in an error event is
    /// still `Ok` here, the caller inspects `report.state`.
    pub async fn translate<W: Write>(
        &self,
        input_file: &Path,
        request: TranslationRequestContext,
        framing: EventFraming,
        out: &mut W,
    ) -> Result<PipelineReport> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {}", input_file.display()));
        }

        let staged = FileManager::stage_upload(input_file, &self.config.paths.upload_dir)?;
        debug!("Staged {} as {}", input_file.display(), staged.display());

        let progress_bar = ProgressBar::new(Self::count_blocks(&staged));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("=>-"));

        let (mut events, handle) = self.service.translate_file(staged, request);

        while let Some(event) = events.recv().await {
            if let TranslationEvent::Progress { sequence_number, .. } = &event {
                progress_bar.inc(1);
                progress_bar.set_message(format!("#{}", sequence_number));
            }

            out.write_all(framing.frame(&event).as_bytes())
                .context("Failed to write event")?;
            out.flush().context("Failed to flush event stream")?;
        }

        let report = handle.await.context("Translation task panicked")?;
        progress_bar.finish_and_clear();

        match &report.output_path {
            Some(path) => info!(
                "Translated {} blocks in {:.1}s: {}",
                report.translated_blocks,
                start_time.elapsed().as_secs_f64(),
                path.display()
            ),
            None => warn!(
                "Translation ended as {:?} after {} blocks",
                report.state, report.translated_blocks
            ),
        }

        Ok(report)
    }

    // @returns: Number of parsable blocks, used to size the progress bar
    fn count_blocks(path: &Path) -> u64 {
        FileManager::read_source(path)
            .map(|content| subtitle_processor::parse_srt_string(&content).blocks.len() as u64)
            .unwrap_or(0)
    }

    /// Translate one block again and write the response record to `out`.
    ///
    /// Returns whether the retry succeeded.
    pub async fn retry<W: Write>(
        &self,
        original_text: &str,
        request: &TranslationRequestContext,
        out: &mut W,
    ) -> Result<bool> {
        let response = match self.service.retry_chunk(original_text, request).await {
            Ok(translated) => RetryResponse::success(translated),
            Err(e) => {
                warn!("Retry failed: {}", e);
                RetryResponse::failure(e.user_message())
            }
        };

        writeln!(out, "{}", response.to_json())?;
        Ok(response.success)
    }

    // @returns: Dictionary as stored on disk, an empty one when the file is missing
    fn load_dictionary(&self) -> Result<Dictionary> {
        let path = &self.config.paths.dictionary_file;
        if !FileManager::file_exists(path) {
            return Ok(Dictionary::new());
        }
        Ok(Dictionary::load(path)?)
    }

    /// Write the dictionary as pretty JSON to `out`
    pub fn show_dictionary<W: Write>(&self, out: &mut W) -> Result<()> {
        let dictionary = self.load_dictionary()?;
        writeln!(out, "{}", dictionary.to_pretty_json()?)?;
        Ok(())
    }

    /// Add or replace one term
    pub fn set_dictionary_entry(&self, term: &str, replacement: &str) -> Result<()> {
        if term.trim().is_empty() {
            return Err(anyhow!("Dictionary term must not be empty"));
        }

        let mut dictionary = self.load_dictionary()?;
        match dictionary.insert(term, replacement) {
            Some(old) => info!("Updated '{}': '{}' -> '{}'", term, old, replacement),
            None => info!("Added '{}' -> '{}'", term, replacement),
        }
        dictionary.save(&self.config.paths.dictionary_file)
    }

    /// Remove one term; returns whether it was present
    pub fn remove_dictionary_entry(&self, term: &str) -> Result<bool> {
        let mut dictionary = self.load_dictionary()?;
        if dictionary.remove(term).is_none() {
            warn!("Term '{}' is not in the dictionary", term);
            return Ok(false);
        }
        dictionary.save(&self.config.paths.dictionary_file)?;
        Ok(true)
    }

    /// Replace the whole dictionary with the contents of `source`
    pub fn import_dictionary(&self, source: &Path) -> Result<usize> {
        let imported = Dictionary::load(source)?;
        let mut dictionary = self.load_dictionary()?;
        dictionary.replace_all(imported);
        dictionary.save(&self.config.paths.dictionary_file)?;
        info!("Imported {} dictionary entries from {}", dictionary.len(), source.display());
        Ok(dictionary.len())
    }

    /// Verify credentials and model with a minimal request
    pub async fn check_connection(&self, request: &TranslationRequestContext) -> Result<()> {
        self.service
            .test_connection(&request.api_key, &request.model_name)
            .await
            .map_err(|e| anyhow!("Connection check failed: {}", e))?;
        info!("Connection to {} verified", request.model_name);
        Ok(())
    }
}
