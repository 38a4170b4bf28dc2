//! Keyed artifact cache backends
//!
//! A backend stores a set of files under a key and restores them into
//! the same paths later, possibly from another job's process.

use crate::error::{TandemError, TandemResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Keyed cache put/get
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Upload `paths` under `key`, replacing any previous entry
    async fn save(&self, paths: &[PathBuf], key: &str) -> TandemResult<()>;

    /// Download the entry for `key` into `paths`
    ///
    /// Returns the matched key on a hit, `None` on a miss.
    async fn restore(&self, paths: &[PathBuf], key: &str) -> TandemResult<Option<String>>;
}

/// Cache backend rooted in a shared directory
///
/// Each key maps to a subdirectory named by a digest of the key, holding
/// the saved files by file name.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Entry directory for a key
    fn entry_dir(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.root.join(hex::encode(&digest[..8]))
    }
}

fn file_name(path: &Path) -> TandemResult<&std::ffi::OsStr> {
    path.file_name().ok_or_else(|| {
        TandemError::Internal(format!("cache path has no file name: {}", path.display()))
    })
}

#[async_trait]
impl CacheBackend for DirectoryCache {
    async fn save(&self, paths: &[PathBuf], key: &str) -> TandemResult<()> {
        let entry = self.entry_dir(key);
        fs::create_dir_all(&entry)
            .await
            .map_err(|e| TandemError::io(format!("creating cache entry {}", entry.display()), e))?;

        for path in paths {
            let target = entry.join(file_name(path)?);
            fs::copy(path, &target).await.map_err(|e| {
                TandemError::io(format!("saving {} to cache", path.display()), e)
            })?;
        }

        fs::write(entry.join(".key"), key)
            .await
            .map_err(|e| TandemError::io("writing cache entry key", e))?;

        debug!("Saved {} file(s) under cache key {}", paths.len(), key);
        Ok(())
    }

    async fn restore(&self, paths: &[PathBuf], key: &str) -> TandemResult<Option<String>> {
        let entry = self.entry_dir(key);
        let marker = entry.join(".key");

        // An entry only counts once its key marker has been written
        let stored = match fs::read_to_string(&marker).await {
            Ok(stored) => stored,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache miss for key {}", key);
                return Ok(None);
            }
            Err(e) => return Err(TandemError::io("reading cache entry key", e)),
        };

        if stored != key {
            debug!("Cache entry digest collision for key {}", key);
            return Ok(None);
        }

        for path in paths {
            let source = entry.join(file_name(path)?);
            if !source.exists() {
                debug!("Cache entry for {} lacks {}", key, source.display());
                return Ok(None);
            }
        }

        for path in paths {
            let source = entry.join(file_name(path)?);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await.map_err(|e| {
                        TandemError::io(format!("creating {}", parent.display()), e)
                    })?;
                }
            }
            fs::copy(&source, path).await.map_err(|e| {
                TandemError::io(format!("restoring {} from cache", path.display()), e)
            })?;
        }

        debug!("Cache hit for key {}", key);
        Ok(Some(stored))
    }
}
