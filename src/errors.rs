/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while building or validating the run configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The API credential is absent or blank
    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,

    /// A recognised option holds a value that cannot be used
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Option name (environment variable)
        key: String,
        /// Raw value that was rejected
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for an `InvalidValue` error
    pub fn invalid(key: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug, Clone, PartialEq)]
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
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The response parsed but carried no usable completion
    #[error("API response contained no completion")]
    EmptyResponse,
}

/// Errors that can occur during translation of a single document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Every attempt allowed by the retry policy failed
    #[error("Translation failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error of the final attempt
        last_error: ProviderError,
    },
}

/// Errors from the version-control collaborator
#[derive(Error, Debug)]
pub enum VcsError {
    /// The VCS binary could not be started
    #[error("Version control unavailable: {0}")]
    Unavailable(String),

    /// The VCS command ran but reported a failure
    #[error("Version control command `{command}` failed: {stderr}")]
    CommandFailed {
        /// The command line that failed
        command: String,
        /// Captured standard error
        stderr: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from version control
    #[error("Version control error: {0}")]
    Vcs(#[from] VcsError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
