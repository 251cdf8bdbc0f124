//! Prompt, call the LLM, extract the SQL, run it.

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use voxql_config::LlmConfig;
use voxql_core::{ResultSet, Stage};
use voxql_lake::{LakeError, QueryExecutor};
use voxql_llm::{LlmClient, LlmError, Prompt, create_llm_client, extract_sql};

use crate::PipelineError;

/// The statement that ran and what it returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub sql: String,
    pub results: ResultSet,
}

/// Turns a natural-language request into executed SQL.
///
/// No retries and no caching: every call prompts the LLM once and queries a
/// snapshot of the table once.
pub struct SqlGenerator {
    llm: OnceLock<Arc<dyn LlmClient>>,
    /// Used to build the client on first use when none was supplied.
    llm_config: Option<LlmConfig>,
    executor: Arc<QueryExecutor>,
    schema_description: String,
}

impl SqlGenerator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        executor: Arc<QueryExecutor>,
        schema_description: impl Into<String>,
    ) -> Self {
        Self {
            llm: OnceLock::from(llm),
            llm_config: None,
            executor,
            schema_description: schema_description.into(),
        }
    }

    /// Defer building the LLM client until the first request.
    ///
    /// A missing key or base URL then fails that request with
    /// [`PipelineError::Generation`] instead of failing startup, and the next
    /// request tries again.
    pub fn from_llm_config(
        config: LlmConfig,
        executor: Arc<QueryExecutor>,
        schema_description: impl Into<String>,
    ) -> Self {
        Self {
            llm: OnceLock::new(),
            llm_config: Some(config),
            executor,
            schema_description: schema_description.into(),
        }
    }

    /// The LLM client, built now if this is the first use.
    ///
    /// # Errors
    ///
    /// [`LlmError::NotConfigured`] (or a client build error) when the
    /// configured provider cannot be constructed. Failures are not cached.
    pub fn llm(&self) -> Result<&Arc<dyn LlmClient>, LlmError> {
        if let Some(llm) = self.llm.get() {
            return Ok(llm);
        }
        let Some(config) = &self.llm_config else {
            return Err(LlmError::NotConfigured("no LLM client".to_string()));
        };
        let client = create_llm_client(config)?;
        tracing::debug!(provider = client.provider_name(), "LLM client ready");
        Ok(self.llm.get_or_init(|| client))
    }

    #[must_use]
    pub fn executor(&self) -> &Arc<QueryExecutor> {
        &self.executor
    }

    #[must_use]
    pub fn schema_description(&self) -> &str {
        &self.schema_description
    }

    /// Generate and run SQL for `user_text`. Empty text is sent as-is.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Generation`] if the LLM call fails,
    /// [`PipelineError::Extraction`] if the reply has no usable SQL block,
    /// [`PipelineError::TableLoad`] or [`PipelineError::QueryExecution`] if
    /// the statement cannot run.
    #[tracing::instrument(skip_all, fields(provider = tracing::field::Empty))]
    pub async fn generate(&self, user_text: &str) -> Result<Generation, PipelineError> {
        let llm = self.llm()?;
        tracing::Span::current().record("provider", llm.provider_name());

        let prompt = Prompt::new(&self.schema_description, user_text);
        tracing::debug!(stage = %Stage::Prompted, chars = user_text.len());

        let reply = llm.generate(&prompt).await?;
        tracing::debug!(stage = %Stage::Generated, chars = reply.len());

        let sql = extract_sql(&reply).inspect_err(|_| {
            tracing::warn!(reply_chars = reply.len(), "LLM reply had no usable sql block");
        })?;
        tracing::info!(stage = %Stage::Extracted, %sql, "extracted SQL");

        let executor = Arc::clone(&self.executor);
        let statement = sql.clone();
        let results = tokio::task::spawn_blocking(move || executor.run_query(&statement))
            .await
            .map_err(|e| LakeError::QueryExecution(format!("query task failed: {e}")))??;
        tracing::debug!(stage = %Stage::Executed, rows = results.len());

        Ok(Generation { sql, results })
    }
}
