//! LLM provider configuration.

use serde::{Deserialize, Serialize};

/// Which LLM API the generator talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// Google Gemini `generateContent`.
    #[default]
    Gemini,
    /// Any server exposing `/v1/chat/completions` (`OpenAI`, Ollama, vLLM, ...).
    OpenaiCompatible,
}

fn default_model() -> String {
    String::from("gemini-2.5-flash")
}

const fn default_temperature() -> f32 {
    0.0
}

const fn default_max_output_tokens() -> u32 {
    2048
}

const fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    /// API key. Falls back to `GEMINI_API_KEY` / `GOOGLE_API_KEY` for Gemini.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider's base URL. Required for `openai_compatible`.
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Whole-request timeout for one generation call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            api_key: String::new(),
            model: default_model(),
            base_url: String::new(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// API key from config, or from the conventional Google env vars.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        match self.provider {
            LlmProvider::Gemini => ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
                .into_iter()
                .filter_map(|name| std::env::var(name).ok())
                .find(|key| !key.is_empty()),
            LlmProvider::OpenaiCompatible => None,
        }
    }

    /// Check if the LLM config has the minimum required fields.
    ///
    /// Gemini needs a key; an OpenAI-compatible server needs a base URL (local
    /// servers often run without a key).
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.provider {
            LlmProvider::Gemini => self.resolved_api_key().is_some(),
            LlmProvider::OpenaiCompatible => !self.base_url.is_empty(),
        }
    }
}
