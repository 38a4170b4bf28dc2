//! Configuration schema for Tandem
//!
//! Configuration is stored at `~/.config/tandem/config.toml`

use crate::api::DEFAULT_TRACE_HEADER;
use crate::cache::DEFAULT_KEY_PREFIX;
use crate::session::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote session API
    pub api: ApiConfig,

    /// Session id cache
    pub cache: CacheConfig,

    /// Runtime version probe
    pub probe: ProbeConfig,

    /// Readiness polling
    pub readiness: ReadinessConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Remote session API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the session API
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Name of the trace-correlation header
    pub trace_header: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: 30,
            trace_header: DEFAULT_TRACE_HEADER.to_string(),
        }
    }
}

/// Session id cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Shared cache directory (defaults to the state directory)
    pub dir: Option<PathBuf>,

    /// Directory the session record file is written to
    pub work_dir: PathBuf,

    /// First component of every cache key
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            work_dir: PathBuf::from("."),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// Runtime version probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Program to run
    pub command: String,

    /// Arguments passed to the program
    pub args: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: "node".to_string(),
            args: vec!["-v".to_string()],
        }
    }
}

/// Readiness polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Delay between status queries
    pub interval_ms: u64,

    /// Accumulated wait after which polling gives up
    pub timeout_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            timeout_ms: 20000,
        }
    }
}

impl Config {
    /// Reject values that would make a command misbehave at runtime
    pub fn validate(&self) -> Result<(), String> {
        if self.readiness.interval_ms == 0 {
            return Err("readiness.interval_ms must be greater than zero".to_string());
        }
        if self.api.timeout_secs == 0 {
            return Err("api.timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl ReadinessConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.interval_ms),
            ceiling: Duration::from_millis(self.timeout_ms),
        }
    }
}
