//! Session id persistence across job boundaries

use crate::cache::backend::CacheBackend;
use crate::cache::key::CacheKey;
use crate::error::{TandemError, TandemResult};
use crate::session::SessionId;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Persists the session id as a plain-text record under the cache key
pub struct SessionStore {
    backend: Arc<dyn CacheBackend>,
    work_dir: PathBuf,
}

impl SessionStore {
    /// Create a store writing records into `work_dir`
    pub fn new(backend: Arc<dyn CacheBackend>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            work_dir: work_dir.into(),
        }
    }

    /// Local record file for a key
    pub fn record_path(&self, key: &CacheKey) -> PathBuf {
        self.work_dir.join(format!("{}.txt", key))
    }

    /// Write the id locally, then upload it under the key
    pub async fn persist(&self, key: &CacheKey, id: &SessionId) -> TandemResult<()> {
        info!("Using cache: {}", key);
        let path = self.record_path(key);

        fs::write(&path, id.as_str())
            .await
            .map_err(|e| TandemError::io(format!("writing session record {}", path.display()), e))?;

        self.backend.save(&[path], key.as_str()).await
    }

    /// Download the record for the key, if any job has written one
    pub async fn retrieve(&self, key: &CacheKey) -> TandemResult<Option<SessionId>> {
        info!("Using cache: {}", key);
        let path = self.record_path(key);

        if self
            .backend
            .restore(&[path.clone()], key.as_str())
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| TandemError::io(format!("reading session record {}", path.display()), e))?;

        if content.is_empty() {
            debug!("Session record {} is empty", path.display());
            return Ok(None);
        }

        Ok(Some(SessionId::new(content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::backend::DirectoryCache;
    use crate::cache::key::{derive_key, RunEnvironment};
    use tempfile::TempDir;

    fn key() -> CacheKey {
        derive_key("sessionId", &RunEnvironment::new(7, "ubuntu22"), "v20.0.0")
    }

    #[tokio::test]
    async fn persist_then_retrieve_across_jobs() {
        let cache_dir = TempDir::new().unwrap();
        let shared = Arc::new(DirectoryCache::new(cache_dir.path()));
        let first_job = TempDir::new().unwrap();
        let second_job = TempDir::new().unwrap();

        let writer = SessionStore::new(shared.clone(), first_job.path());
        writer.persist(&key(), &SessionId::new("sess-123")).await.unwrap();

        let reader = SessionStore::new(shared, second_job.path());
        let id = reader.retrieve(&key()).await.unwrap();

        assert_eq!(id, Some(SessionId::new("sess-123")));
    }

    #[tokio::test]
    async fn record_is_raw_id() {
        let cache_dir = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let store = SessionStore::new(Arc::new(DirectoryCache::new(cache_dir.path())), work.path());

        store.persist(&key(), &SessionId::new("a b\"c")).await.unwrap();

        let path = store.record_path(&key());
        assert_eq!(path, work.path().join("sessionId-7-ubuntu22-v20.0.0.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a b\"c");
    }

    #[tokio::test]
    async fn retrieve_miss_is_not_an_error() {
        let cache_dir = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let store = SessionStore::new(Arc::new(DirectoryCache::new(cache_dir.path())), work.path());

        assert_eq!(store.retrieve(&key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_record_counts_as_miss() {
        let cache_dir = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let backend = Arc::new(DirectoryCache::new(cache_dir.path()));
        let store = SessionStore::new(backend.clone(), work.path());

        let path = store.record_path(&key());
        std::fs::write(&path, "").unwrap();
        backend.save(&[path], key().as_str()).await.unwrap();

        assert_eq!(store.retrieve(&key()).await.unwrap(), None);
    }
}
