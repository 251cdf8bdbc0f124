//! Lake error types.

use std::path::PathBuf;

/// Errors that can occur while loading the table or running a query.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// `DuckDB` connection-level failure (open, pragma, introspection).
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// The CSV source does not exist or is not a regular file.
    #[error("Source file not found: {}", path.display())]
    SourceMissing {
        /// Configured source path.
        path: PathBuf,
    },

    /// The engine could not materialize the table from the source file.
    #[error("Failed to load table '{table}' from {}: {message}", path.display())]
    TableLoad {
        /// Target table name.
        table: String,
        /// Configured source path.
        path: PathBuf,
        /// Engine message.
        message: String,
    },

    /// The caller's statement was rejected or failed during execution.
    #[error("{0}")]
    QueryExecution(String),

    /// I/O error while inspecting the source file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LakeError {
    /// Whether the failure happened while (re)building the table snapshot.
    #[must_use]
    pub const fn is_table_load(&self) -> bool {
        matches!(
            self,
            Self::SourceMissing { .. } | Self::TableLoad { .. } | Self::Io(_)
        )
    }
}
