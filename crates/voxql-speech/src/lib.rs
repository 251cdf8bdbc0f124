//! # voxql-speech
//!
//! Speech-to-text behind the [`Transcriber`] trait.
//!
//! - [`WhisperTranscriber`]: local whisper.cpp model, loaded lazily and
//!   shared across calls. Audio is decoded with symphonia and resampled to
//!   16 kHz mono.
//! - [`RemoteTranscriber`]: `OpenAI`-compatible transcription endpoint.

pub mod decode;
pub mod error;
pub mod remote;
pub mod whisper;

pub use error::SpeechError;
pub use remote::RemoteTranscriber;
pub use whisper::WhisperTranscriber;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use voxql_config::{SpeechConfig, SpeechProvider};

/// Turns an audio file into text. Silence yields an empty string, not an error.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, SpeechError>;

    fn provider_name(&self) -> &str;
}

/// Trim each segment, drop empty ones, and join the rest with single spaces.
pub fn join_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for segment in segments {
        let text = segment.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(text);
    }
    out
}

/// Build the transcriber selected by `speech.provider`.
///
/// # Errors
///
/// [`SpeechError::NotConfigured`] when the remote provider has no base URL.
pub fn create_transcriber(config: &SpeechConfig) -> Result<Arc<dyn Transcriber>, SpeechError> {
    let transcriber: Arc<dyn Transcriber> = match config.provider {
        SpeechProvider::Whisper => Arc::new(WhisperTranscriber::from_config(config)),
        SpeechProvider::Remote => Arc::new(RemoteTranscriber::from_config(config)?),
    };
    tracing::debug!(provider = transcriber.provider_name(), "transcriber ready");
    Ok(transcriber)
}
