//! Cross-cutting error types for voxql.
//!
//! Stage-specific errors (`LakeError`, `LlmError`, `SpeechError`) live in their
//! own crates and converge in `voxql-pipeline`.

use thiserror::Error;

/// Errors raised while building core values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A row did not carry one value per declared column.
    #[error("Row {row} has {actual} values but the result declares {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
