//! Session lifecycle management

pub mod lifecycle;
pub mod state;

pub use lifecycle::{Readiness, SessionLifecycle};
pub use state::{
    RetryPolicy, RetryState, SessionId, SessionPhase, SessionStatus, MIN_POLL_INTERVAL,
};
