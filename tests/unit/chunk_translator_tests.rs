/*!
 * Tests for single-block translation
 */

use std::sync::Arc;
use std::time::Duration;
use srtstream::dictionary::Dictionary;
use srtstream::errors::TranslationError;
use srtstream::providers::mock::MockProvider;
use srtstream::translation::prompts::build_translation_prompt;
use srtstream::translation::{ChunkTranslator, PromptTemplate};
use crate::common;

fn translator(provider: MockProvider) -> ChunkTranslator {
    ChunkTranslator::new(Arc::new(provider), 0.2, Duration::from_secs(5))
}

/// Test that the provider answer is returned and the prompt is built from template and dictionary
#[tokio::test]
async fn test_translate_chunk_withWorkingProvider_shouldReturnTranslatedText() {
    let provider = common::uppercase_provider();
    let dictionary = Dictionary::from_pairs([("Jedi", "Jedi")]);
    let request = common::test_request();

    let result = translator(provider.clone())
        .translate_chunk("Hello", &request, &dictionary)
        .await
        .unwrap();

    assert_eq!(result, "HELLO");
    assert_eq!(
        provider.recorded_prompts(),
        vec![build_translation_prompt(&PromptTemplate::new(common::TEST_TEMPLATE), "Hello", &dictionary)]
    );
}

/// Test that surrounding whitespace of the answer is removed
#[tokio::test]
async fn test_translate_chunk_withPaddedAnswer_shouldTrim() {
    let provider = MockProvider::working().with_custom_response(|_| "  Salam \n".to_string());

    let result = translator(provider)
        .translate_chunk("Hello", &common::test_request(), &Dictionary::new())
        .await
        .unwrap();

    assert_eq!(result, "Salam");
}

/// Test that a blank answer becomes an empty translation, not a failure
#[tokio::test]
async fn test_translate_chunk_withBlankAnswer_shouldReturnEmptyString() {
    let result = translator(MockProvider::empty())
        .translate_chunk("Hello", &common::test_request(), &Dictionary::new())
        .await
        .unwrap();

    assert_eq!(result, "");
}

/// Test credential rejection
#[tokio::test]
async fn test_translate_chunk_withUnauthorizedProvider_shouldReturnAuthorization() {
    let result = translator(MockProvider::unauthorized())
        .translate_chunk("Hello", &common::test_request(), &Dictionary::new())
        .await;

    assert!(result.unwrap_err().is_authorization());
}

/// Test server failures
#[tokio::test]
async fn test_translate_chunk_withFailingProvider_shouldReturnTransient() {
    let provider = MockProvider::failing();

    let result = translator(provider.clone())
        .translate_chunk("Hello", &common::test_request(), &Dictionary::new())
        .await;

    assert!(matches!(result, Err(TranslationError::Transient(_))));
    assert_eq!(provider.request_count(), 1);
}

/// Test that a call exceeding the time bound is abandoned
#[tokio::test]
async fn test_translate_chunk_withSlowProvider_shouldTimeOut() {
    let translator = ChunkTranslator::new(Arc::new(MockProvider::slow(500)), 0.2, Duration::from_millis(20));

    let result = translator
        .translate_chunk("Hello", &common::test_request(), &Dictionary::new())
        .await;

    assert!(matches!(result, Err(TranslationError::Transient(_))));
}
