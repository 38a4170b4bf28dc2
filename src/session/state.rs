//! Session identity, remote status and lifecycle phase

use crate::cache::CacheKey;
use std::fmt;
use std::time::Duration;

/// Opaque identifier assigned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by the remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Usable
    Ready,
    /// Reclaimed remotely; can never become ready
    Swept,
    /// Any other status string, still starting up
    Pending(String),
}

impl From<String> for SessionStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "Ready" => Self::Ready,
            "Swept" => Self::Swept,
            _ => Self::Pending(status),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::Swept => write!(f, "Swept"),
            Self::Pending(status) => write!(f, "{}", status),
        }
    }
}

/// Current phase of a session lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    KeyBuilt {
        key: CacheKey,
    },
    Active {
        key: CacheKey,
        id: SessionId,
    },
    Ready {
        key: CacheKey,
        id: SessionId,
    },
    Swept {
        key: CacheKey,
        id: SessionId,
    },
    TimedOut {
        key: CacheKey,
        id: SessionId,
        waited: Duration,
    },
}

impl SessionPhase {
    /// Cache key, once setup has run
    pub fn key(&self) -> Option<&CacheKey> {
        match self {
            Self::Uninitialized => None,
            Self::KeyBuilt { key }
            | Self::Active { key, .. }
            | Self::Ready { key, .. }
            | Self::Swept { key, .. }
            | Self::TimedOut { key, .. } => Some(key),
        }
    }

    /// Session id, once started or resumed
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Uninitialized | Self::KeyBuilt { .. } => None,
            Self::Active { id, .. }
            | Self::Ready { id, .. }
            | Self::Swept { id, .. }
            | Self::TimedOut { id, .. } => Some(id),
        }
    }

    /// Short phase name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::KeyBuilt { .. } => "key-built",
            Self::Active { .. } => "active",
            Self::Ready { .. } => "ready",
            Self::Swept { .. } => "swept",
            Self::TimedOut { .. } => "timed-out",
        }
    }
}

/// Shortest delay allowed between status queries
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Interval and ceiling for the readiness poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub ceiling: Duration,
}

impl RetryPolicy {
    /// Raise the interval to [`MIN_POLL_INTERVAL`]
    ///
    /// A zero interval never accumulates wait, so the ceiling would never
    /// be reached.
    pub fn bounded(self) -> Self {
        Self {
            interval: self.interval.max(MIN_POLL_INTERVAL),
            ceiling: self.ceiling,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3000),
            ceiling: Duration::from_millis(20000),
        }
    }
}

/// Accumulated wait of one readiness poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    policy: RetryPolicy,
    elapsed: Duration,
    attempts: u32,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy: policy.bounded(),
            elapsed: Duration::ZERO,
            attempts: 0,
        }
    }

    /// Record one status query
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Whether the accumulated wait has reached the ceiling
    pub fn exhausted(&self) -> bool {
        self.elapsed >= self.policy.ceiling
    }

    /// Account for one interval of waiting
    pub fn advance(&mut self) {
        self.elapsed += self.policy.interval;
    }

    pub fn interval(&self) -> Duration {
        self.policy.interval
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
