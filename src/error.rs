//! Error types for Tandem
//!
//! All modules use `TandemResult<T>` as their return type.

use crate::api::TransportError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Tandem operations
pub type TandemResult<T> = Result<T, TandemError>;

/// Broad classification used by callers that need to branch on failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operations invoked out of order (programmer error, never retried)
    State,
    /// Network, subprocess, filesystem and configuration failures
    Infrastructure,
    /// Expected terminal outcomes of the readiness poll
    Outcome,
}

/// All errors that can occur in Tandem
#[derive(Error, Debug)]
pub enum TandemError {
    // Sequencing errors
    #[error("Session setup must be called before accessing the cache")]
    NotInitialized,

    #[error("No session id recorded. Start or resume a session first")]
    NoActiveSession,

    // Remote API errors
    #[error("Request failed: {method} {url}: {source}")]
    Network {
        method: String,
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Unexpected response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("API URL not configured")]
    ApiUrlMissing,

    // Terminal session outcomes
    #[error("Session swept: {id}")]
    SessionSwept { id: String },

    #[error("Session {id} not ready after waiting {waited_ms}ms")]
    SessionTimeout { id: String, waited_ms: u64 },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file already exists: {0}")]
    ConfigExists(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TandemError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized | Self::NoActiveSession => ErrorKind::State,
            Self::SessionSwept { .. } | Self::SessionTimeout { .. } => ErrorKind::Outcome,
            _ => ErrorKind::Infrastructure,
        }
    }

    /// Whether the error is an expected terminal outcome rather than a fault
    pub fn is_terminal(&self) -> bool {
        self.kind() == ErrorKind::Outcome
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ApiUrlMissing => Some("Pass --api-url or set TANDEM_API_URL"),
            Self::NoActiveSession => Some("Run: tandem start, or tandem resume in a later job"),
            Self::SessionSwept { .. } => Some("The session was reclaimed. Run: tandem start"),
            Self::SessionTimeout { .. } => {
                Some("Raise readiness.timeout_ms in the config or retry the job")
            }
            _ => None,
        }
    }
}
