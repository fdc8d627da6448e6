//! Standalone re-translation of one block, answered synchronously.

use std::path::Path;

use log::info;

use crate::dictionary::Dictionary;
use crate::errors::RetryError;
use super::chunk::{ChunkTranslator, TranslationRequestContext};

/// Translate one block's text again.
///
/// The dictionary is read fresh from disk and the provider is called
/// exactly once. Nothing is streamed and nothing is written.
pub async fn retry_chunk(
    translator: &ChunkTranslator,
    dictionary_path: &Path,
    original_text: &str,
    request: &TranslationRequestContext,
) -> Result<String, RetryError> {
    let dictionary = Dictionary::load(dictionary_path)?;
    info!("Retrying a single block ({} chars)", original_text.chars().count());
    Ok(translator.translate_chunk(original_text, request, &dictionary).await?)
}
