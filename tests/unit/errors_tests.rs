/*!
 * Tests for error classification and user-facing messages
 */

use std::path::PathBuf;
use srtstream::errors::{
    InputError, PipelineError, ProviderError, RetryError, TranslationError, INVALID_API_KEY_MESSAGE,
};

/// Test that credential rejections become authorization failures
#[test]
fn test_from_providerError_withAuthentication_shouldBeAuthorization() {
    let error = TranslationError::from(ProviderError::AuthenticationError("bad key".to_string()));

    assert!(error.is_authorization());
}

/// Test that timeouts, rate limits and server faults are transient
#[test]
fn test_from_providerError_withRecoverableFailures_shouldBeTransient() {
    let cases = vec![
        ProviderError::Timeout("slow".to_string()),
        ProviderError::ConnectionError("refused".to_string()),
        ProviderError::RateLimitExceeded("quota".to_string()),
        ProviderError::ApiError { status_code: 503, message: "unavailable".to_string() },
    ];

    for case in cases {
        assert!(matches!(TranslationError::from(case), TranslationError::Transient(_)));
    }
}

/// Test that client errors and malformed responses are classified as other
#[test]
fn test_from_providerError_withClientErrors_shouldBeOther() {
    let api = TranslationError::from(ProviderError::ApiError { status_code: 400, message: "bad".to_string() });
    let parse = TranslationError::from(ProviderError::ParseError("no candidates".to_string()));

    assert!(matches!(api, TranslationError::Other(_)));
    assert!(matches!(parse, TranslationError::Other(_)));
}

/// Test that authorization failures use the fixed message
#[test]
fn test_user_message_withAuthorization_shouldUseFixedText() {
    let error = PipelineError::from(TranslationError::Authorization("rejected".to_string()));

    assert_eq!(error.user_message(), INVALID_API_KEY_MESSAGE);
}

/// Test that every other failure is prefixed with the generic text
#[test]
fn test_user_message_withOtherFailures_shouldUseGenericPrefix() {
    let input = PipelineError::from(InputError::DictionaryUnreadable {
        path: PathBuf::from("dictionary.json"),
        message: "No such file or directory".to_string(),
    });
    let output = PipelineError::Output("disk full".to_string());
    let transient = PipelineError::from(TranslationError::Transient("timeout".to_string()));

    for error in [input, output, transient] {
        let message = error.user_message();
        assert!(message.starts_with("An unexpected error occurred: "), "{}", message);
        assert_ne!(message, INVALID_API_KEY_MESSAGE);
    }
}

/// Test that the dictionary path appears in the input error text
#[test]
fn test_inputError_display_shouldNamePath() {
    let error = InputError::MalformedDictionary {
        path: PathBuf::from("terms.json"),
        message: "expected a JSON object".to_string(),
    };

    assert_eq!(error.to_string(), "Malformed dictionary terms.json: expected a JSON object");
}

/// Test retry messages
#[test]
fn test_retryError_user_message_shouldMirrorPipelineRules() {
    let auth = RetryError::from(TranslationError::Authorization("no".to_string()));
    let other = RetryError::from(TranslationError::Other("No candidate text in response".to_string()));

    assert_eq!(auth.user_message(), INVALID_API_KEY_MESSAGE);
    assert_eq!(other.user_message(), "Translation failed: No candidate text in response");
}
