use voxql_config::VoxConfig;

use crate::cli::commands::SqlArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::{context, output};

/// Handle `voxql sql`: run a statement without the LLM.
pub async fn handle(args: &SqlArgs, config: &VoxConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let executor = context::executor(config)?;
    let statement = args.statement.clone();
    let results = tokio::task::spawn_blocking(move || executor.run_query(&statement)).await??;

    if flags.format == OutputFormat::Table {
        println!("{}", output::result_table(&results));
        return Ok(());
    }
    output::output(&results, flags.format)
}
