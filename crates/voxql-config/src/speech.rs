//! Speech-to-text configuration.

use serde::{Deserialize, Serialize};

/// Which transcription backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechProvider {
    /// Local whisper.cpp model file.
    #[default]
    Whisper,
    /// `OpenAI`-compatible `/v1/audio/transcriptions` endpoint.
    Remote,
}

fn default_model_path() -> String {
    String::from("models/ggml-base.bin")
}

fn default_language() -> String {
    String::from("en")
}

fn default_remote_model() -> String {
    String::from("whisper-1")
}

const fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub provider: SpeechProvider,

    /// Path to a ggml whisper model (`whisper` provider).
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Spoken language hint. Empty lets whisper auto-detect.
    #[serde(default = "default_language")]
    pub language: String,

    /// Inference threads. 0 picks `min(available_parallelism, 4)`.
    #[serde(default)]
    pub threads: u16,

    /// Base URL of the remote transcription server (`remote` provider).
    #[serde(default)]
    pub base_url: String,

    /// Bearer token for the remote server. May be empty for local servers.
    #[serde(default)]
    pub api_key: String,

    /// Model name sent to the remote server.
    #[serde(default = "default_remote_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            model_path: default_model_path(),
            language: default_language(),
            threads: 0,
            base_url: String::new(),
            api_key: String::new(),
            model: default_remote_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SpeechConfig {
    /// Check if the selected provider has the minimum required fields.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        match self.provider {
            SpeechProvider::Whisper => !self.model_path.is_empty(),
            SpeechProvider::Remote => !self.base_url.is_empty(),
        }
    }
}
