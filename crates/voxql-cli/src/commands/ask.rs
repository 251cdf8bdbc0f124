use voxql_config::VoxConfig;
use voxql_core::responses::QueryResponse;

use crate::cli::commands::AskArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::{context, output};

/// Handle `voxql ask`.
pub async fn handle(args: &AskArgs, config: &VoxConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let generator = context::generator(config)?;
    let generation = generator.generate(&args.text).await?;

    if flags.format == OutputFormat::Table {
        println!("{}\n", generation.sql);
        println!("{}", output::result_table(&generation.results));
        return Ok(());
    }
    output::output(
        &QueryResponse::new(generation.sql, generation.results),
        flags.format,
    )
}
