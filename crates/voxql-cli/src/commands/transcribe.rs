use anyhow::Context;
use voxql_config::VoxConfig;
use voxql_core::responses::UploadResponse;

use crate::cli::GlobalFlags;
use crate::cli::commands::AudioArgs;
use crate::{context, output};

/// Handle `voxql transcribe`.
pub async fn handle(
    args: &AudioArgs,
    config: &VoxConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let transcriber = context::transcriber(config)?;
    let transcription = transcriber
        .transcribe(&args.audio)
        .await
        .with_context(|| format!("failed to transcribe {}", args.audio.display()))?;

    let response = UploadResponse::new(args.audio.display().to_string(), transcription);
    output::output(&response, flags.format)
}
