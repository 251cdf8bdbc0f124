//! Client for servers speaking the `OpenAI` chat completions API
//! (`OpenAI`, Ollama, vLLM, llama.cpp server).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use voxql_config::LlmConfig;

use crate::http::{build_client, check_response};
use crate::{LlmClient, LlmError, Prompt};

pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompatibleClient {
    /// Build from config. `llm.base_url` is required; the key is optional.
    ///
    /// # Errors
    ///
    /// [`LlmError::NotConfigured`] without a base URL, [`LlmError::Http`] if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        if config.base_url.is_empty() {
            return Err(LlmError::NotConfigured(
                "llm.base_url is required for openai_compatible".to_string(),
            ));
        }
        Ok(Self {
            http: build_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolved_api_key(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn request_body<'a>(&'a self, prompt: &Prompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: prompt.system().to_string(),
                },
                Message {
                    role: "user",
                    content: format!("{}\n\n{}", prompt.schema(), prompt.user()),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut request = self.http.post(&url).json(&self.request_body(prompt));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let data: ChatResponse = check_response(request.send().await?).await?.json().await?;

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    fn provider_name(&self) -> &str {
        "openai_compatible"
    }
}
