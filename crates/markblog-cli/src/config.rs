use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "markblog.toml";

const DEFAULT_DOCUMENTS_DIR: &str = "markdown";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENTS_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
        }
    }
}

impl Config {
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        log::debug!("loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    /// Resolves the effective configuration.
    ///
    /// An explicit `--config` path must exist; the default file is optional.
    /// A directory given on the command line (or via `MARKBLOG_DIR`) wins
    /// over the file.
    pub fn resolve(
        config_path: Option<&Path>,
        dir_override: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?
                .ok_or_else(|| anyhow::anyhow!("config file not found: {}", path.display()))?,
            None => Self::load_from_path(DEFAULT_CONFIG_FILE)?.unwrap_or_default(),
        };

        if let Some(dir) = dir_override {
            config.documents_dir = dir;
        }
        Ok(config)
    }
}
