//! Cache key derivation
//!
//! Jobs of the same workflow run, OS image and runtime version derive the
//! same key and therefore share one session.

use crate::error::TandemResult;
use crate::probe::VersionProbe;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Default key prefix
pub const DEFAULT_KEY_PREFIX: &str = "sessionId";

/// Identity of the current workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEnvironment {
    /// Workflow run identifier (`GITHUB_RUN_ID`)
    pub run_id: u64,
    /// Runner OS image identifier (`ImageOS`)
    pub os_image: String,
}

impl RunEnvironment {
    pub fn new(run_id: u64, os_image: impl Into<String>) -> Self {
        Self {
            run_id,
            os_image: os_image.into(),
        }
    }
}

/// Key scoping the persisted session id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep a key component safe for use as a file name
fn sanitize(component: &str) -> String {
    component
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive a cache key from its inputs
///
/// Pure: identical inputs always yield an identical key. The reverse does not
/// hold: sanitizing is lossy, so `"v1 beta"` and `"v1/beta"` both end in
/// `v1_beta` and two runs whose inputs differ only in disallowed characters
/// share one key.
pub fn derive_key(prefix: &str, run: &RunEnvironment, version: &str) -> CacheKey {
    CacheKey(format!(
        "{}-{}-{}-{}",
        sanitize(prefix),
        run.run_id,
        sanitize(&run.os_image),
        sanitize(version)
    ))
}

/// Builds the cache key for this process
pub struct CacheKeyBuilder {
    prefix: String,
    run: RunEnvironment,
    probe: Arc<dyn VersionProbe>,
}

impl CacheKeyBuilder {
    pub fn new(prefix: impl Into<String>, run: RunEnvironment, probe: Arc<dyn VersionProbe>) -> Self {
        Self {
            prefix: prefix.into(),
            run,
            probe,
        }
    }

    /// Probe the runtime version and derive the key
    pub async fn build_key(&self) -> TandemResult<CacheKey> {
        let version = self.probe.version().await?;
        let key = derive_key(&self.prefix, &self.run, &version);
        debug!("Derived cache key {} (runtime {})", key, version.trim());
        Ok(key)
    }
}
