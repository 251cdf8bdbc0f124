//! # voxql-config
//!
//! Layered configuration loading for voxql using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VOXQL_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `./voxql.toml`
//! 4. User-level `~/.config/voxql/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VOXQL_LLM__API_KEY` -> `llm.api_key`,
//! `VOXQL_DATASET__SOURCE_PATH` -> `dataset.source_path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use voxql_config::VoxConfig;
//!
//! let config = VoxConfig::load_with_dotenv(None).expect("config");
//! println!("serving on {}", config.server.bind_address());
//! ```

mod dataset;
mod error;
mod llm;
mod server;
mod speech;

pub use dataset::{DatasetConfig, ReloadPolicy};
pub use error::ConfigError;
pub use llm::{LlmConfig, LlmProvider};
pub use server::ServerConfig;
pub use speech::{SpeechConfig, SpeechProvider};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "voxql.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VoxConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl VoxConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if `explicit` does not exist or the merged
    /// values fail validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            return Err(ConfigError::InvalidValue {
                field: "config".into(),
                reason: format!("file {} does not exist", path.display()),
            });
        }

        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer more providers on top.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("VOXQL_").split("__"))
    }

    /// Reject values that would only fail later, deep inside a request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.table.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dataset.table".into(),
                reason: "table name must not be empty".into(),
            });
        }
        if self.dataset.source_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dataset.source_path".into(),
                reason: "source file path must not be empty".into(),
            });
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_upload_bytes".into(),
                reason: "must be greater than zero".into(),
            });
        }
        for (field, secs) in [
            ("llm.timeout_secs", self.llm.timeout_secs),
            ("speech.timeout_secs", self.speech.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: "must be at least one second".into(),
                });
            }
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".into(),
                reason: format!("{} is outside 0.0..=2.0", self.llm.temperature),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("voxql").join("config.toml"))
    }
}
