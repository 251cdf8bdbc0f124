//! # voxql-lake
//!
//! `DuckDB` query executor for the one queryable table.
//!
//! The table is materialized from a header-having CSV file with
//! `read_csv_auto` and queried with arbitrary caller SQL. Reload and query
//! happen inside one critical section: the executor owns a single
//! [`Connection`] behind a [`Mutex`], so a reload can never interleave with
//! another caller's query.
//!
//! ## Reload policy
//!
//! - [`ReloadPolicy::Always`]: drop and recreate the table before every query,
//!   so results always reflect the latest file.
//! - [`ReloadPolicy::OnChange`]: keep the loaded snapshot until the source
//!   file's size or modification time changes.
//!
//! Caller SQL always runs in a rolled-back transaction, so a stray `DELETE`
//! or `DROP TABLE` from the LLM cannot alter the snapshot.
//!
//! ## Async usage
//!
//! `DuckDB` is synchronous. From async code, wrap calls in
//! `tokio::task::spawn_blocking` with an `Arc<QueryExecutor>`.

pub mod error;
mod load;
mod query;
pub mod schema;

pub use error::LakeError;
pub use schema::{ColumnInfo, TableSchema};
pub use voxql_config::ReloadPolicy;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use duckdb::Connection;
use voxql_config::DatasetConfig;
use voxql_core::ResultSet;

use crate::load::SourceFingerprint;

/// Executor over a CSV-backed `DuckDB` table.
pub struct QueryExecutor {
    state: Mutex<LakeState>,
    source_path: PathBuf,
    table: String,
    reload: ReloadPolicy,
}

struct LakeState {
    conn: Connection,
    /// Fingerprint of the source at the last successful load.
    loaded: Option<SourceFingerprint>,
}

impl QueryExecutor {
    /// Open the executor described by the dataset config.
    ///
    /// Uses an in-memory database when `database_path` is empty. The table is
    /// not loaded until the first query.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the database cannot be opened.
    pub fn open(config: &DatasetConfig) -> Result<Self, LakeError> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.database_path)?
        };
        Ok(Self::with_connection(
            conn,
            &config.source_path,
            &config.table,
            config.reload,
        ))
    }

    /// Open an in-memory executor over `source_path` (for tests and one-off use).
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if `DuckDB` cannot start.
    pub fn open_in_memory(
        source_path: impl AsRef<Path>,
        table: &str,
    ) -> Result<Self, LakeError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::with_connection(
            conn,
            source_path.as_ref(),
            table,
            ReloadPolicy::Always,
        ))
    }

    fn with_connection(
        conn: Connection,
        source_path: impl AsRef<Path>,
        table: &str,
        reload: ReloadPolicy,
    ) -> Self {
        Self {
            state: Mutex::new(LakeState { conn, loaded: None }),
            source_path: source_path.as_ref().to_path_buf(),
            table: table.to_string(),
            reload,
        }
    }

    /// Replace the reload policy.
    #[must_use]
    pub fn with_reload_policy(mut self, reload: ReloadPolicy) -> Self {
        self.reload = reload;
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub const fn reload_policy(&self) -> ReloadPolicy {
        self.reload
    }

    /// Reload the table per policy, then run `sql` and materialize every row.
    ///
    /// # Errors
    ///
    /// Returns a table-load error ([`LakeError::SourceMissing`],
    /// [`LakeError::TableLoad`]) if the snapshot cannot be rebuilt, or
    /// [`LakeError::QueryExecution`] carrying the engine message if the
    /// statement fails.
    #[tracing::instrument(skip(self, sql), fields(table = %self.table))]
    pub fn run_query(&self, sql: &str) -> Result<ResultSet, LakeError> {
        let mut state = self.lock();
        self.ensure_loaded(&mut state)?;

        let started = std::time::Instant::now();
        let result = Self::execute_rolled_back(&mut state, sql)?;
        tracing::debug!(
            rows = result.len(),
            columns = result.columns().len(),
            elapsed_ms = started.elapsed().as_millis(),
            "query executed"
        );
        Ok(result)
    }

    /// Drop and recreate the table now, regardless of policy.
    ///
    /// # Errors
    ///
    /// Returns a table-load error if the source is missing or malformed.
    pub fn reload(&self) -> Result<(), LakeError> {
        let mut state = self.lock();
        self.load_into(&mut state)
    }

    /// Introspect the loaded table's columns.
    ///
    /// # Errors
    ///
    /// Returns a table-load error if the snapshot cannot be rebuilt, or
    /// [`LakeError::DuckDb`] if introspection fails.
    pub fn describe(&self) -> Result<TableSchema, LakeError> {
        let mut state = self.lock();
        self.ensure_loaded(&mut state)?;
        schema::describe(&state.conn, &self.table)
    }

    /// Run caller SQL inside a transaction that is always rolled back, so
    /// writes and DDL never reach the loaded snapshot. If the statement ended
    /// the transaction itself, the snapshot is marked stale.
    fn execute_rolled_back(state: &mut LakeState, sql: &str) -> Result<ResultSet, LakeError> {
        state.conn.execute_batch("BEGIN TRANSACTION")?;
        let result = query::execute(&state.conn, sql);
        if let Err(error) = state.conn.execute_batch("ROLLBACK") {
            tracing::debug!(%error, "statement closed the transaction; snapshot marked stale");
            state.loaded = None;
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, LakeState> {
        // A panic mid-query leaves the connection usable; the next call reloads
        // under `Always` anyway.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_loaded(&self, state: &mut LakeState) -> Result<(), LakeError> {
        match self.reload {
            ReloadPolicy::Always => self.load_into(state),
            ReloadPolicy::OnChange => {
                let current = SourceFingerprint::of(&self.source_path)?;
                if state.loaded.as_ref() == Some(&current) {
                    tracing::trace!("source unchanged; reusing table snapshot");
                    return Ok(());
                }
                self.load_into(state)
            }
        }
    }

    fn load_into(&self, state: &mut LakeState) -> Result<(), LakeError> {
        state.loaded = None;
        load::recreate_table(&state.conn, &self.table, &self.source_path)?;
        state.loaded = Some(SourceFingerprint::of(&self.source_path)?);
        tracing::debug!(source = %self.source_path.display(), "table reloaded");
        Ok(())
    }
}
