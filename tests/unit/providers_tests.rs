/*!
 * Tests for provider implementations
 */

use std::time::Duration;
use anyhow::Result;
use srtstream::errors::{ProviderError, TranslationError};
use srtstream::providers::gemini::{error_from_status, Gemini, GeminiRequest, GeminiResponse, DEFAULT_GEMINI_ENDPOINT};
use srtstream::providers::mock::MockProvider;
use srtstream::providers::{ApiKey, CompletionRequest, Provider};

fn completion(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        api_key: ApiKey::new("key"),
        model: "model".to_string(),
        prompt: prompt.to_string(),
        temperature: 0.2,
    }
}

/// Test that the API key never shows up in debug output
#[test]
fn test_apiKey_debug_shouldRedactSecret() {
    let request = completion("hi");

    let printed = format!("{:?}", request);

    assert!(printed.contains("ApiKey(***)"));
    assert!(!printed.contains("\"key\""));
}

/// Test generateContent URL construction
#[test]
fn test_generate_url_withDefaultEndpoint_shouldUseV1beta() -> Result<()> {
    let gemini = Gemini::new(DEFAULT_GEMINI_ENDPOINT, Duration::from_secs(5))?;

    assert_eq!(
        gemini.generate_url("gemini-2.0-flash")?.as_str(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
    );
    assert_eq!(
        gemini.generate_url("models/gemini-1.5-pro")?.as_str(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
    );
    Ok(())
}

/// Test that an already versioned endpoint is kept
#[test]
fn test_generate_url_withVersionedEndpoint_shouldKeepVersion() -> Result<()> {
    let gemini = Gemini::new("http://localhost:8080/v1/", Duration::from_secs(5))?;

    assert_eq!(
        gemini.generate_url("m")?.as_str(),
        "http://localhost:8080/v1/models/m:generateContent"
    );
    assert!(gemini.generate_url("  ").is_err());
    Ok(())
}

/// Test the request body layout
#[test]
fn test_geminiRequest_serialization_shouldUseCamelCase() -> Result<()> {
    let body = serde_json::to_value(GeminiRequest::new("hi", 0.5))?;

    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
    assert_eq!(body["generationConfig"]["temperature"], 0.5);
    Ok(())
}

/// Test that candidate parts are concatenated
#[test]
fn test_geminiResponse_text_withSeveralParts_shouldConcatenate() -> Result<()> {
    let response: GeminiResponse = serde_json::from_str(
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Sal"},{"text":"am"}]},"finishReason":"STOP"}],
            "usageMetadata":{"promptTokenCount":12,"candidatesTokenCount":3}}"#,
    )?;

    assert_eq!(response.text()?, "Salam");
    assert_eq!(response.usage_metadata.and_then(|u| u.prompt_token_count), Some(12));
    Ok(())
}

/// Test that blocked or empty responses are parse errors
#[test]
fn test_geminiResponse_text_withBlockedOrEmpty_shouldFail() -> Result<()> {
    let blocked: GeminiResponse = serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)?;
    let empty: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#)?;
    let no_text: GeminiResponse = serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#)?;

    assert!(matches!(blocked.text(), Err(ProviderError::ParseError(_))));
    assert!(matches!(empty.text(), Err(ProviderError::ParseError(_))));
    assert!(matches!(no_text.text(), Err(ProviderError::ParseError(_))));
    Ok(())
}

/// Test HTTP status classification
#[test]
fn test_error_from_status_withAuthStatuses_shouldBeAuthentication() {
    let invalid_key = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT",
        "details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID"}]}}"#;

    match error_from_status(400, invalid_key) {
        ProviderError::AuthenticationError(message) => {
            assert_eq!(message, "API key not valid. Please pass a valid API key.");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(error_from_status(401, ""), ProviderError::AuthenticationError(_)));
    assert!(matches!(error_from_status(403, "denied"), ProviderError::AuthenticationError(_)));
}

/// Test that other statuses keep their code
#[test]
fn test_error_from_status_withOtherStatuses_shouldClassify() {
    assert!(matches!(error_from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        error_from_status(400, r#"{"error":{"message":"bad model","status":"INVALID_ARGUMENT"}}"#),
        ProviderError::ApiError { status_code: 400, .. }
    ));

    let server = TranslationError::from(error_from_status(500, "internal"));
    assert!(matches!(server, TranslationError::Transient(_)));
}

/// Test that an empty key is rejected before any network access
#[tokio::test]
async fn test_gemini_complete_withEmptyKey_shouldFailAsAuthentication() -> Result<()> {
    let gemini = Gemini::new("http://127.0.0.1:9", Duration::from_secs(1))?;
    let mut request = completion("hi");
    request.api_key = ApiKey::new("   ");

    let result = gemini.complete(request).await;

    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
    Ok(())
}

/// Test the intermittent mock
#[test]
fn test_mockProvider_intermittent_shouldFailEveryNthRequest() {
    let provider = MockProvider::intermittent(2);

    tokio_test::block_on(async {
        tokio_test::assert_ok!(provider.complete(completion("a")).await);
        tokio_test::assert_err!(provider.complete(completion("b")).await);
        tokio_test::assert_ok!(provider.complete(completion("c")).await);
    });
}
