//! Session lifecycle: setup, start or resume, then wait until ready
//!
//! One lifecycle drives one sequential workflow per process. The job that
//! calls [`SessionLifecycle::start`] publishes the session id under the
//! cache key; other jobs of the same run pick it up with
//! [`SessionLifecycle::resume`].

use crate::api::SessionClient;
use crate::cache::{CacheKey, CacheKeyBuilder, SessionStore};
use crate::error::{TandemError, TandemResult};
use crate::session::state::{RetryPolicy, RetryState, SessionId, SessionPhase, SessionStatus};
use std::time::Duration;
use tracing::{debug, error, info};

/// Outcome of a successful readiness poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// Status queries issued
    pub attempts: u32,
    /// Time spent sleeping between queries
    pub waited: Duration,
}

/// Orchestrates key derivation, persistence and the remote API
pub struct SessionLifecycle {
    keys: CacheKeyBuilder,
    store: SessionStore,
    client: SessionClient,
    policy: RetryPolicy,
    phase: SessionPhase,
}

impl SessionLifecycle {
    pub fn new(keys: CacheKeyBuilder, store: SessionStore, client: SessionClient) -> Self {
        Self {
            keys,
            store,
            client,
            policy: RetryPolicy::default(),
            phase: SessionPhase::Uninitialized,
        }
    }

    /// Override the readiness poll interval and ceiling
    ///
    /// Intervals below [`MIN_POLL_INTERVAL`](crate::session::MIN_POLL_INTERVAL)
    /// are raised to it.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy.bounded();
        self
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn key(&self) -> Option<&CacheKey> {
        self.phase.key()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.phase.session_id()
    }

    fn require_key(&self) -> TandemResult<CacheKey> {
        self.phase.key().cloned().ok_or(TandemError::NotInitialized)
    }

    /// Derive the cache key; must precede start and resume
    pub async fn setup(&mut self) -> TandemResult<&CacheKey> {
        let key = self.keys.build_key().await?;
        self.phase = SessionPhase::KeyBuilt { key };
        debug!("Phase: {}", self.phase.name());
        self.phase.key().ok_or(TandemError::NotInitialized)
    }

    /// Create a new session and publish its id under the cache key
    pub async fn start(&mut self) -> TandemResult<&SessionId> {
        let key = self.require_key()?;

        let id = match self.create_and_persist(&key).await {
            Ok(id) => id,
            Err(e) => {
                error!("Unable to start session");
                return Err(e);
            }
        };

        info!("Session Started: {}", id);
        self.phase = SessionPhase::Active { key, id };
        debug!("Phase: {}", self.phase.name());
        self.phase.session_id().ok_or(TandemError::NoActiveSession)
    }

    async fn create_and_persist(&self, key: &CacheKey) -> TandemResult<SessionId> {
        let id = self.client.create().await?;
        self.store.persist(key, &id).await?;
        Ok(id)
    }

    /// Pick up a session another job of this run has started
    ///
    /// Returns `false` when no record exists for the key; that is a normal
    /// outcome, not an error.
    pub async fn resume(&mut self) -> TandemResult<bool> {
        let key = self.require_key()?;

        match self.store.retrieve(&key).await? {
            Some(id) => {
                info!("Session Resumed: {}", id);
                self.phase = SessionPhase::Active { key, id };
                debug!("Phase: {}", self.phase.name());
                Ok(true)
            }
            None => {
                info!("No Session Found");
                Ok(false)
            }
        }
    }

    /// Resume the run's session, starting one if none exists yet
    pub async fn connect(&mut self) -> TandemResult<&SessionId> {
        if !self.resume().await? {
            self.start().await?;
        }
        self.phase.session_id().ok_or(TandemError::NoActiveSession)
    }

    /// Query the session status once
    pub async fn status(&self) -> TandemResult<SessionStatus> {
        let id = self.phase.session_id().ok_or(TandemError::NoActiveSession)?;
        self.client.status(id).await
    }

    /// Poll the session status until it is ready
    ///
    /// `Swept` fails at once regardless of the remaining budget. Any other
    /// non-ready status waits one interval and polls again until the
    /// accumulated wait reaches the ceiling.
    pub async fn wait_until_ready(&mut self) -> TandemResult<Readiness> {
        let (key, id) = match &self.phase {
            SessionPhase::Uninitialized | SessionPhase::KeyBuilt { .. } => {
                return Err(TandemError::NoActiveSession)
            }
            SessionPhase::Swept { id, .. } => {
                return Err(TandemError::SessionSwept { id: id.to_string() })
            }
            SessionPhase::Active { key, id }
            | SessionPhase::Ready { key, id }
            | SessionPhase::TimedOut { key, id, .. } => (key.clone(), id.clone()),
        };

        let mut retry = RetryState::new(self.policy);

        loop {
            retry.record_attempt();
            let status = self.client.status(&id).await?;
            info!("Status: {}", status);

            match status {
                SessionStatus::Ready => {
                    self.phase = SessionPhase::Ready { key, id };
                    debug!("Phase: {}", self.phase.name());
                    return Ok(Readiness {
                        attempts: retry.attempts(),
                        waited: retry.elapsed(),
                    });
                }
                SessionStatus::Swept => {
                    error!("Session {} was swept", id);
                    self.phase = SessionPhase::Swept {
                        key,
                        id: id.clone(),
                    };
                    return Err(TandemError::SessionSwept { id: id.to_string() });
                }
                SessionStatus::Pending(_) if retry.exhausted() => {
                    let waited = retry.elapsed();
                    error!("Session {} not ready after {:?}", id, waited);
                    self.phase = SessionPhase::TimedOut {
                        key,
                        id: id.clone(),
                        waited,
                    };
                    return Err(TandemError::SessionTimeout {
                        id: id.to_string(),
                        waited_ms: waited.as_millis() as u64,
                    });
                }
                SessionStatus::Pending(_) => {
                    debug!(
                        "Waiting {:?} before polling again ({:?} elapsed)",
                        retry.interval(),
                        retry.elapsed()
                    );
                    tokio::time::sleep(retry.interval()).await;
                    retry.advance();
                }
            }
        }
    }
}
