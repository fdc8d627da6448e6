use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::warn;

use crate::translation::pipeline::PipelineSettings;
use crate::translation::prompts::PromptTemplate;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. Credentials are not part of
/// it: they are supplied with each request.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO), also the output file suffix
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
}

impl TranslationProvider {
    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Locations of uploads, translations and the dictionary
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    // @field: Directory receiving staged input files
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    // @field: Directory receiving translated files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    // @field: Terminology dictionary JSON file
    #[serde(default = "default_dictionary_file")]
    pub dictionary_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            dictionary_file: default_dictionary_file(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Service endpoint URL
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// Default model name, overridable per request
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Default prompt template; must contain `{chunk}`
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,

    /// Temperature parameter for text generation
    /// Lower values make output more deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout of a single model call in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause after each translated block in milliseconds
    #[serde(default = "default_inter_block_delay_ms")]
    pub inter_block_delay_ms: u64,

    /// Emit an event for every block that fails to parse
    #[serde(default)]
    pub report_skipped_blocks: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: default_gemini_endpoint(),
            model: default_gemini_model(),
            prompt_template: default_prompt_template(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            inter_block_delay_ms: default_inter_block_delay_ms(),
            report_skipped_blocks: false,
        }
    }
}

impl TranslationConfig {
    /// Upper bound for one model call
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pause after each block
    pub fn inter_block_delay(&self) -> Duration {
        Duration::from_millis(self.inter_block_delay_ms)
    }

    /// Default template as a typed value
    pub fn default_prompt(&self) -> PromptTemplate {
        PromptTemplate::new(self.prompt_template.clone())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "fa".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("translations")
}

fn default_dictionary_file() -> PathBuf {
    PathBuf::from("dictionary.json")
}

fn default_gemini_endpoint() -> String {
    crate::providers::gemini::DEFAULT_GEMINI_ENDPOINT.to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_prompt_template() -> String {
    PromptTemplate::SUBTITLE_TRANSLATOR.to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_inter_block_delay_ms() -> u64 {
    2000
}

impl Config {
    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.target_language)?;

        if self.translation.model.trim().is_empty() {
            return Err(anyhow!("A default model name is required"));
        }

        if !self.translation.default_prompt().has_placeholder() {
            return Err(anyhow!("Prompt template must contain the {{chunk}} placeholder"));
        }

        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0, got {}", self.translation.temperature));
        }

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least one second"));
        }

        if self.paths.output_dir == self.paths.upload_dir {
            return Err(anyhow!("Output directory must differ from the upload directory"));
        }

        Ok(())
    }

    /// Settings handed to the translation pipeline
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            dictionary_path: self.paths.dictionary_file.clone(),
            output_dir: self.paths.output_dir.clone(),
            target_language: self.target_language.trim().to_lowercase(),
            inter_block_delay: self.translation.inter_block_delay(),
            report_skipped_blocks: self.translation.report_skipped_blocks,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            paths: PathsConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
