//! Stage-tagged pipeline errors.

use thiserror::Error;
use voxql_core::Stage;
use voxql_lake::LakeError;
use voxql_llm::{ExtractionError, LlmError};
use voxql_speech::SpeechError;

/// A request failure, tagged with the stage that failed.
///
/// The display text is prefixed with the stage and carries the underlying
/// cause, e.g. the engine's parser message for bad SQL.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transcription failed: {0}")]
    Transcription(#[from] SpeechError),

    #[error("SQL generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("SQL extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("table load failed: {0}")]
    TableLoad(LakeError),

    #[error("query execution failed: {0}")]
    QueryExecution(LakeError),
}

impl From<LakeError> for PipelineError {
    fn from(error: LakeError) -> Self {
        if error.is_table_load() {
            Self::TableLoad(error)
        } else {
            Self::QueryExecution(error)
        }
    }
}

impl PipelineError {
    /// The stage the request failed to reach.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Transcription(_) => Stage::Transcribed,
            Self::Generation(_) => Stage::Generated,
            Self::Extraction(_) => Stage::Extracted,
            Self::TableLoad(_) | Self::QueryExecution(_) => Stage::Executed,
        }
    }
}
