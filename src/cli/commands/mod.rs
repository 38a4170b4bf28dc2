//! CLI command implementations

pub mod config;
pub mod key;
pub mod resume;
pub mod start;
pub mod status;
pub mod up;
pub mod wait;

pub use config::execute as config;
pub use key::execute as key;
pub use resume::execute as resume;
pub use start::execute as start;
pub use status::execute as status;
pub use up::execute as up;
pub use wait::execute as wait;

use crate::api::{SessionClient, UreqTransport};
use crate::cache::{CacheKeyBuilder, DirectoryCache, RunEnvironment, SessionStore};
use crate::cli::args::SessionArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{TandemError, TandemResult};
use crate::probe::CommandProbe;
use crate::session::SessionLifecycle;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Key builder for the run described by `args`
fn key_builder(args: &SessionArgs, config: &Config) -> CacheKeyBuilder {
    let probe = CommandProbe::new(config.probe.command.clone(), config.probe.args.clone());
    CacheKeyBuilder::new(
        config.cache.key_prefix.clone(),
        RunEnvironment::new(args.run_id, args.os_image.clone()),
        Arc::new(probe),
    )
}

/// Wire a lifecycle from flags and configuration
fn build_lifecycle(args: &SessionArgs, config: &Config) -> TandemResult<SessionLifecycle> {
    let base_url = args
        .api_url
        .clone()
        .or_else(|| config.api.base_url.clone())
        .ok_or(TandemError::ApiUrlMissing)?;
    let token = args.token.clone().or_else(|| config.api.token.clone());

    let transport = UreqTransport::new(
        base_url,
        token,
        Duration::from_secs(config.api.timeout_secs),
    );
    let client = SessionClient::new(Arc::new(transport))
        .with_trace_header(config.api.trace_header.clone());

    let cache_dir = args
        .cache_dir
        .clone()
        .or_else(|| config.cache.dir.clone())
        .unwrap_or_else(ConfigManager::default_cache_dir);
    let store = SessionStore::new(
        Arc::new(DirectoryCache::new(cache_dir)),
        config.cache.work_dir.clone(),
    );

    Ok(
        SessionLifecycle::new(key_builder(args, config), store, client)
            .with_policy(config.readiness.policy()),
    )
}

/// Resume the run's session or fail with `NoActiveSession`
async fn resume_required(args: &SessionArgs, config: &Config) -> TandemResult<SessionLifecycle> {
    let mut lifecycle = build_lifecycle(args, config)?;
    lifecycle.setup().await?;
    if !lifecycle.resume().await? {
        return Err(TandemError::NoActiveSession);
    }
    Ok(lifecycle)
}

/// Wait for readiness behind a spinner
async fn wait_ready(lifecycle: &mut SessionLifecycle) -> TandemResult<()> {
    let pb = create_progress_bar("Waiting for session to become ready...");
    let result = lifecycle.wait_until_ready().await;
    pb.finish_and_clear();

    let readiness = result?;
    let id = lifecycle.session_id().ok_or(TandemError::NoActiveSession)?;
    println!(
        "{} Session {} ready ({} checks, waited {}s)",
        style("✓").green(),
        style(id).cyan(),
        readiness.attempts,
        readiness.waited.as_secs()
    );
    Ok(())
}

fn create_progress_bar(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(spinner);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
