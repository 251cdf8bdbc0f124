//! Speech error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The audio file could not be read.
    #[error("audio I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container or codec could not be decoded to PCM.
    #[error("audio decoding failed: {0}")]
    Decode(String),

    /// The whisper model could not be loaded. Not cached, so the next call
    /// retries.
    #[error("failed to load whisper model {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    /// Model inference failed after a successful load.
    #[error("whisper inference failed: {0}")]
    Inference(String),

    /// HTTP transport error talking to a remote transcription service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service returned a non-success status.
    #[error("transcription API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("speech provider not configured: {0}")]
    NotConfigured(String),
}
