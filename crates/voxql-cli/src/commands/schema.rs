use serde::Serialize;
use voxql_config::VoxConfig;
use voxql_lake::TableSchema;

use crate::cli::GlobalFlags;
use crate::{context, output};

#[derive(Serialize)]
struct SchemaReport {
    table: String,
    columns: Vec<voxql_lake::ColumnInfo>,
    /// Description rendered from the loaded table.
    loaded: String,
    /// Description sent to the LLM.
    configured: String,
}

/// Handle `voxql schema`: compare the loaded table with the prompt's schema text.
pub async fn handle(config: &VoxConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let executor = context::executor(config)?;
    let schema: TableSchema = tokio::task::spawn_blocking(move || executor.describe()).await??;

    let configured = config.dataset.schema_description.trim().to_string();
    let loaded = schema.description();
    if !loaded.eq_ignore_ascii_case(&configured) {
        tracing::warn!(%loaded, %configured, "configured schema description differs from the loaded table");
    }

    let report = SchemaReport {
        table: schema.table,
        columns: schema.columns,
        loaded,
        configured,
    };
    output::output(&report, flags.format)
}
