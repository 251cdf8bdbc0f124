//! # voxql-llm
//!
//! The LLM side of voxql: prompt assembly, provider clients behind the
//! [`LlmClient`] trait, and extraction of the SQL statement from the reply.
//!
//! - [`GeminiClient`]: Google Gemini `generateContent` (default).
//! - [`OpenAiCompatibleClient`]: any `/v1/chat/completions` server.

pub mod error;
pub mod extract;
pub mod gemini;
mod http;
pub mod openai;
pub mod prompt;

pub use error::{ExtractionError, LlmError};
pub use extract::{extract_all_sql, extract_sql};
pub use gemini::GeminiClient;
pub use openai::OpenAiCompatibleClient;
pub use prompt::{Prompt, SYSTEM_PROMPT};

use std::sync::Arc;

use async_trait::async_trait;
use voxql_config::{LlmConfig, LlmProvider};

/// A text-generation backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `prompt` and return the raw reply text.
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError>;

    /// Short provider name for logs.
    fn provider_name(&self) -> &str;
}

/// Build the client selected by `llm.provider`.
///
/// # Errors
///
/// Returns [`LlmError::NotConfigured`] when the provider lacks its key or
/// base URL.
pub fn create_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::from_config(config)?),
        LlmProvider::OpenaiCompatible => Arc::new(OpenAiCompatibleClient::from_config(config)?),
    };
    tracing::debug!(provider = client.provider_name(), model = %config.model, "llm client ready");
    Ok(client)
}
