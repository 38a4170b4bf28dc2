//! Configuration loading for Tandem
//!
//! The file is optional: a missing file yields [`Config::default`]. Values
//! that parse but cannot work at runtime (a zero poll interval, for one) are
//! rejected here so every command sees the same error.

pub mod schema;

pub use schema::Config;

use crate::error::{TandemError, TandemResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, reads and writes the config file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Use `path` when given, otherwise the per-user default
    pub fn locate(path: Option<PathBuf>) -> Self {
        Self {
            config_path: path.unwrap_or_else(Self::default_config_path),
        }
    }

    /// `<config dir>/tandem/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tandem")
            .join("config.toml")
    }

    /// Shared cache directory used when neither flag nor config names one
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tandem")
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Read and validate the config file
    pub async fn load(&self) -> TandemResult<Config> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.config_path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(TandemError::io(
                    format!("reading config from {}", self.config_path.display()),
                    e,
                ))
            }
        };

        let config: Config = toml::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;
        config.validate().map_err(|reason| self.invalid(reason))?;
        Ok(config)
    }

    /// Write the default config, refusing to replace an existing file unless `force`
    pub async fn init(&self, force: bool) -> TandemResult<()> {
        let exists = fs::try_exists(&self.config_path)
            .await
            .map_err(|e| TandemError::io(format!("checking {}", self.config_path.display()), e))?;
        if exists && !force {
            return Err(TandemError::ConfigExists(self.config_path.clone()));
        }
        self.save(&Config::default()).await
    }

    /// Serialize `config` to the config path, creating parent directories
    pub async fn save(&self, config: &Config) -> TandemResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TandemError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            TandemError::io(format!("writing config to {}", self.config_path.display()), e)
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    fn invalid(&self, reason: String) -> TandemError {
        TandemError::ConfigInvalid {
            path: self.config_path.clone(),
            reason,
        }
    }
}
