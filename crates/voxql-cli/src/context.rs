//! Component wiring for command handlers.

use std::sync::Arc;

use anyhow::Context;
use voxql_config::VoxConfig;
use voxql_lake::QueryExecutor;
use voxql_pipeline::{Pipeline, SqlGenerator};
use voxql_speech::{Transcriber, create_transcriber};

pub fn executor(config: &VoxConfig) -> anyhow::Result<Arc<QueryExecutor>> {
    let executor = QueryExecutor::open(&config.dataset).with_context(|| {
        format!(
            "failed to open dataset (database_path={:?})",
            config.dataset.database_path
        )
    })?;
    Ok(Arc::new(executor))
}

/// The LLM client inside is built on first use, so `serve` starts without a key.
pub fn generator(config: &VoxConfig) -> anyhow::Result<SqlGenerator> {
    Ok(SqlGenerator::from_llm_config(
        config.llm.clone(),
        executor(config)?,
        config.dataset.schema_description.clone(),
    ))
}

pub fn transcriber(config: &VoxConfig) -> anyhow::Result<Arc<dyn Transcriber>> {
    create_transcriber(&config.speech).context("failed to set up the transcriber")
}

pub fn pipeline(config: &VoxConfig) -> anyhow::Result<Pipeline> {
    Ok(Pipeline::new(transcriber(config)?, generator(config)?))
}

/// Log a warning for each section that looks intended but is not usable.
pub fn warn_unconfigured(config: &VoxConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &VoxConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.llm.is_configured() {
        if has_env_prefix(&env_keys, "VOXQL_LLM") {
            warnings.push(
                "LLM config is incomplete while VOXQL_LLM* env vars exist. Use double underscores (example: VOXQL_LLM__API_KEY)."
                    .to_string(),
            );
        } else {
            warnings.push(
                "No LLM API key found. Set GEMINI_API_KEY, GOOGLE_API_KEY or llm.api_key.".to_string(),
            );
        }
    }

    if !config.speech.is_configured() && has_env_prefix(&env_keys, "VOXQL_SPEECH") {
        warnings.push(
            "Speech config is incomplete while VOXQL_SPEECH* env vars exist. Use double underscores (example: VOXQL_SPEECH__BASE_URL)."
                .to_string(),
        );
    }

    if !std::path::Path::new(&config.dataset.source_path).is_file() {
        warnings.push(format!(
            "Dataset source {} does not exist yet; queries will fail until it does.",
            config.dataset.source_path
        ));
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
