//! # voxql-pipeline
//!
//! The request pipeline: audio to transcript, transcript to SQL via the LLM,
//! SQL to rows via `DuckDB`.
//!
//! [`Pipeline`] is the composition root. It owns one transcriber and one
//! [`SqlGenerator`], which in turn holds the shared `Arc<QueryExecutor>`.
//! Steps within a request run in order; independent requests run
//! concurrently, with table reload and query serialized inside the executor.

pub mod error;
pub mod generator;

pub use error::PipelineError;
pub use generator::{Generation, SqlGenerator};

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use voxql_config::VoxConfig;
use voxql_core::{ResultSet, Stage};
use voxql_lake::QueryExecutor;
use voxql_speech::{Transcriber, create_transcriber};

/// Everything one voice request produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutcome {
    pub transcript: String,
    pub sql: String,
    pub results: ResultSet,
}

pub struct Pipeline {
    transcriber: Arc<dyn Transcriber>,
    generator: SqlGenerator,
}

impl Pipeline {
    pub fn new(transcriber: Arc<dyn Transcriber>, generator: SqlGenerator) -> Self {
        Self {
            transcriber,
            generator,
        }
    }

    /// Wire the configured transcriber, LLM client, and executor together.
    ///
    /// The LLM client is built on the first query, so a missing API key does
    /// not stop transcription-only use.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever component cannot be built, tagged with
    /// the stage it serves.
    pub fn from_config(config: &VoxConfig) -> Result<Self, PipelineError> {
        let transcriber = create_transcriber(&config.speech)?;
        let executor = Arc::new(QueryExecutor::open(&config.dataset)?);
        let generator = SqlGenerator::from_llm_config(
            config.llm.clone(),
            executor,
            config.dataset.schema_description.clone(),
        );
        Ok(Self::new(transcriber, generator))
    }

    #[must_use]
    pub const fn generator(&self) -> &SqlGenerator {
        &self.generator
    }

    /// Transcribe one audio file.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Transcription`] on decode, model, or service failure.
    #[tracing::instrument(skip(self), fields(provider = self.transcriber.provider_name()))]
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String, PipelineError> {
        let transcript = self.transcriber.transcribe(audio_path).await?;
        tracing::info!(stage = %Stage::Transcribed, chars = transcript.len(), "transcribed");
        Ok(transcript)
    }

    /// Generate and run SQL for already-transcribed text.
    ///
    /// # Errors
    ///
    /// See [`SqlGenerator::generate`].
    pub async fn query(&self, text: &str) -> Result<Generation, PipelineError> {
        self.generator.generate(text).await
    }

    /// Transcribe, then query. Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Any [`PipelineError`]; [`PipelineError::stage`] names where it stopped.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, audio_path: &Path) -> Result<PipelineOutcome, PipelineError> {
        let transcript = self.transcribe(audio_path).await?;
        let Generation { sql, results } = self.query(&transcript).await?;
        tracing::info!(stage = %Stage::Completed, rows = results.len(), "request completed");
        Ok(PipelineOutcome {
            transcript,
            sql,
            results,
        })
    }
}
