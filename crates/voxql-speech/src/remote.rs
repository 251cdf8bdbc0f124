//! Transcription through an `OpenAI`-compatible `/v1/audio/transcriptions`
//! endpoint. Accepts whatever the server accepts, including browser webm/opus.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use voxql_config::SpeechConfig;

use crate::{SpeechError, Transcriber};

pub struct RemoteTranscriber {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    language: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl RemoteTranscriber {
    /// # Errors
    ///
    /// [`SpeechError::NotConfigured`] without `speech.base_url`,
    /// [`SpeechError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        if config.base_url.is_empty() {
            return Err(SpeechError::NotConfigured(
                "speech.base_url is required for the remote provider".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("voxql/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: (!config.api_key.is_empty()).then(|| config.api_key.clone()),
            model: config.model.clone(),
            language: config.language.clone(),
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("webm") => "audio/webm",
        Some("ogg" | "oga" | "opus") => "audio/ogg",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Transcriber for RemoteTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, SpeechError> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(audio_path))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", part);
        if !self.language.is_empty() {
            form = form.text("language", self.language.clone());
        }

        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        tracing::debug!(model = %self.model, %url, "sending audio to remote transcription");
        let mut request = self.http.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SpeechError::Remote {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let body: TranscriptionResponse = resp.json().await?;
        Ok(body.text.trim().to_string())
    }

    fn provider_name(&self) -> &str {
        "remote"
    }
}
