//! Response types returned as JSON by the HTTP surface and the `voxql` CLI.

use serde::Serialize;

use crate::ResultSet;

/// Response from `POST /upload` and `voxql transcribe`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub transcription: String,
    /// True iff the transcription has non-whitespace content.
    pub locked: bool,
}

impl UploadResponse {
    #[must_use]
    pub fn new(filename: impl Into<String>, transcription: impl Into<String>) -> Self {
        let transcription = transcription.into();
        Self {
            success: true,
            filename: filename.into(),
            locked: !transcription.trim().is_empty(),
            transcription,
        }
    }
}

/// Response from `POST /query` and `voxql ask`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryResponse {
    pub success: bool,
    pub sql: String,
    pub results: ResultSet,
}

impl QueryResponse {
    #[must_use]
    pub const fn new(sql: String, results: ResultSet) -> Self {
        Self {
            success: true,
            sql,
            results,
        }
    }
}

/// Response from `POST /voice-query` and `voxql run`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VoiceQueryResponse {
    pub success: bool,
    pub filename: String,
    pub transcription: String,
    pub sql: String,
    pub results: ResultSet,
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            filename: None,
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}
