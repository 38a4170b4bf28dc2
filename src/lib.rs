//! Tandem - shared CI sessions
//!
//! Lets the jobs of one workflow run share a single remote ephemeral
//! session: the first job creates it and publishes its id through a keyed
//! cache, later jobs resume it, and every job waits until it is ready.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod probe;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{ErrorKind, TandemError, TandemResult};
pub use session::SessionLifecycle;
