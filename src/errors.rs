/*!
 * Error types for the srtstream application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// User-facing text for rejected credentials
pub const INVALID_API_KEY_MESSAGE: &str = "Invalid API Key. Please verify your key and permissions.";

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The call did not finish within its time bound
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Outcome classes of a single chunk translation.
///
/// Callers match on the variant instead of inspecting messages: an
/// authorization failure is reported differently from every other failure.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The capability rejected the credentials
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Timeout, network trouble, rate limiting or a server-side fault
    #[error("Transient translation failure: {0}")]
    Transient(String),

    /// Malformed or empty response, or any other API error
    #[error("Translation failed: {0}")]
    Other(String),
}

impl TranslationError {
    /// Whether the failure was a credentials problem
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }
}

impl From<ProviderError> for TranslationError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::AuthenticationError(message) => Self::Authorization(message),
            ProviderError::ConnectionError(_)
            | ProviderError::Timeout(_)
            | ProviderError::RateLimitExceeded(_)
            | ProviderError::RequestFailed(_) => Self::Transient(error.to_string()),
            ProviderError::ApiError { status_code, .. } if status_code >= 500 => {
                Self::Transient(error.to_string())
            }
            ProviderError::ApiError { .. } | ProviderError::ParseError(_) => {
                Self::Other(error.to_string())
            }
        }
    }
}

/// Problems loading the inputs of a request. Always fatal, raised before
/// any translation starts.
#[derive(Error, Debug)]
pub enum InputError {
    /// The subtitle file is missing or unreadable
    #[error("Failed to read subtitle file {path}: {message}")]
    SourceFile { path: PathBuf, message: String },

    /// The dictionary file is missing or unreadable
    #[error("Failed to read dictionary {path}: {message}")]
    DictionaryUnreadable { path: PathBuf, message: String },

    /// The dictionary file is not a JSON object of strings
    #[error("Malformed dictionary {path}: {message}")]
    MalformedDictionary { path: PathBuf, message: String },
}

/// Errors that end a streaming translation job
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Loading the source or the dictionary failed
    #[error(transparent)]
    Input(#[from] InputError),

    /// A block could not be translated
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// The translated file could not be written
    #[error("Failed to write translated file: {0}")]
    Output(String),
}

impl PipelineError {
    /// Message carried by the terminal error event
    pub fn user_message(&self) -> String {
        match self {
            Self::Translation(e) if e.is_authorization() => INVALID_API_KEY_MESSAGE.to_string(),
            other => format!("An unexpected error occurred: {}", other),
        }
    }
}

/// Errors returned by the standalone retry path
#[derive(Error, Debug)]
pub enum RetryError {
    /// The dictionary could not be loaded
    #[error(transparent)]
    Input(#[from] InputError),

    /// The chunk could not be translated
    #[error(transparent)]
    Translation(#[from] TranslationError),
}

impl RetryError {
    /// Message carried by a failed retry response
    pub fn user_message(&self) -> String {
        match self {
            Self::Translation(e) if e.is_authorization() => INVALID_API_KEY_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
