//! Runtime version probing
//!
//! The probed version string feeds cache key derivation so that jobs
//! running different runtimes never share a session.

use crate::error::{TandemError, TandemResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Source of the runtime version string
#[async_trait]
pub trait VersionProbe: Send + Sync {
    /// Query the runtime version, returning captured standard output
    async fn version(&self) -> TandemResult<String>;
}

/// Probe that runs a version-query command as a subprocess
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    /// Create a probe for `program` with the given arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Command line for diagnostics
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for CommandProbe {
    fn default() -> Self {
        Self::new("node", vec!["-v".to_string()])
    }
}

#[async_trait]
impl VersionProbe for CommandProbe {
    async fn version(&self) -> TandemResult<String> {
        let command = self.command_line();
        debug!("Executing: {}", command);

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TandemError::command_failed(&command, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TandemError::command_exec(command, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
