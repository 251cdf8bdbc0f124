//! LLM and extraction error types.

use thiserror::Error;

/// Failures talking to the LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The response parsed but carried no text (blocked or empty candidate).
    #[error("provider returned no text")]
    EmptyResponse,

    /// The provider is missing a key or base URL.
    #[error("LLM provider not configured: {0}")]
    NotConfigured(String),
}

/// The LLM answered, but not with a usable fenced SQL statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no ```sql fenced block found in LLM response")]
    NoFencedSql,

    #[error("last ```sql fenced block is empty")]
    EmptyStatement,
}
