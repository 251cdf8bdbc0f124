use voxql_config::VoxConfig;
use voxql_core::responses::VoiceQueryResponse;

use crate::cli::commands::AudioArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::{context, output};

/// Handle `voxql run`.
pub async fn handle(
    args: &AudioArgs,
    config: &VoxConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let pipeline = context::pipeline(config)?;
    let outcome = pipeline.run(&args.audio).await?;

    if flags.format == OutputFormat::Table {
        println!("> {}\n", outcome.transcript.trim());
        println!("{}\n", outcome.sql);
        println!("{}", output::result_table(&outcome.results));
        return Ok(());
    }
    let response = VoiceQueryResponse {
        success: true,
        filename: args.audio.display().to_string(),
        transcription: outcome.transcript,
        sql: outcome.sql,
        results: outcome.results,
    };
    output::output(&response, flags.format)
}
