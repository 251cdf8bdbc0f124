use figment::Jail;
use voxql_config::{LlmConfig, VoxConfig};

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file("voxql.toml", "[llm]\nmodel = \"gemini-2.0-flash\"\n")?;
        jail.set_env("VOXQL_LLM__MODEL", "gemini-2.5-pro");
        jail.set_env("VOXQL_SERVER__PORT", "8080");

        let config = VoxConfig::load(None).expect("config loads");
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.server.port, 8080);
        Ok(())
    });
}

#[test]
fn nested_dataset_values_from_env() {
    Jail::expect_with(|jail| {
        jail.set_env("VOXQL_DATASET__SOURCE_PATH", "/data/people.csv");
        jail.set_env("VOXQL_DATASET__RELOAD", "on_change");

        let config = VoxConfig::load(None).expect("config loads");
        assert_eq!(config.dataset.source_path, "/data/people.csv");
        assert_eq!(config.dataset.reload, voxql_config::ReloadPolicy::OnChange);
        Ok(())
    });
}

#[test]
fn gemini_key_falls_back_to_google_env() {
    Jail::expect_with(|jail| {
        jail.set_env("GEMINI_API_KEY", "");
        jail.set_env("GOOGLE_API_KEY", "google-key");

        let config = LlmConfig::default();
        assert_eq!(config.resolved_api_key().as_deref(), Some("google-key"));
        assert!(config.is_configured());
        Ok(())
    });
}

#[test]
fn gemini_env_key_takes_precedence_over_google() {
    Jail::expect_with(|jail| {
        jail.set_env("GEMINI_API_KEY", "gemini-key");
        jail.set_env("GOOGLE_API_KEY", "google-key");

        let config = LlmConfig::default();
        assert_eq!(config.resolved_api_key().as_deref(), Some("gemini-key"));
        Ok(())
    });
}

#[test]
fn zero_speech_timeout_from_env_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("VOXQL_SPEECH__TIMEOUT_SECS", "0");

        let err = VoxConfig::load(None).expect_err("zero timeout rejected");
        assert!(err.to_string().contains("speech.timeout_secs"));
        Ok(())
    });
}
