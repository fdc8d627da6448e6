/*!
 * Tests for application configuration
 */

use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use srtstream::app_config::{Config, LogLevel, TranslationProvider};
use crate::common;

/// Test the default values
#[test]
fn test_default_config_shouldMatchDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.target_language, "fa");
    assert_eq!(config.paths.upload_dir, PathBuf::from("uploads"));
    assert_eq!(config.paths.output_dir, PathBuf::from("translations"));
    assert_eq!(config.paths.dictionary_file, PathBuf::from("dictionary.json"));
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.temperature, 0.2);
    assert_eq!(config.translation.timeout(), Duration::from_secs(300));
    assert_eq!(config.translation.inter_block_delay(), Duration::from_millis(2000));
    assert!(!config.translation.report_skipped_blocks);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that the default configuration is valid
#[test]
fn test_validate_withDefaults_shouldSucceed() {
    assert!(Config::default().validate().is_ok());
}

/// Test the individual validation rules
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.target_language = "zz".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.prompt_template = "Translate this".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.temperature = 3.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.model = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.paths.output_dir = config.paths.upload_dir.clone();
    assert!(config.validate().is_err());
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.target_language, created.target_language);
    assert_eq!(loaded.translation.model, created.translation.model);
    assert_eq!(loaded.translation.prompt_template, created.translation.prompt_template);
    Ok(())
}

/// Test that a partial file is completed with defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"target_language": "de", "translation": {"inter_block_delay_ms": 0}}"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, "de");
    assert_eq!(config.translation.inter_block_delay_ms, 0);
    assert_eq!(config.translation.timeout_secs, 300);
    assert_eq!(config.paths.output_dir, PathBuf::from("translations"));
    Ok(())
}

/// Test that pipeline settings reflect the configuration
#[test]
fn test_pipeline_settings_shouldCopyPathsAndPacing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.target_language = " FA ".to_string();
    config.translation.report_skipped_blocks = true;

    let settings = config.pipeline_settings();

    assert_eq!(settings.dictionary_path, temp_dir.path().join("dictionary.json"));
    assert_eq!(settings.output_dir, temp_dir.path().join("translations"));
    assert_eq!(settings.target_language, "fa");
    assert!(settings.inter_block_delay.is_zero());
    assert!(settings.report_skipped_blocks);
    Ok(())
}

/// Test provider name parsing
#[test]
fn test_translationProvider_fromStr_shouldBeCaseInsensitive() {
    assert_eq!("Gemini".parse::<TranslationProvider>().unwrap(), TranslationProvider::Gemini);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Gemini.to_string(), "gemini");
}
