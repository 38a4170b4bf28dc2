//! Start command - create a session and publish its id

use super::{build_lifecycle, wait_ready};
use crate::cli::args::StartArgs;
use crate::config::Config;
use crate::error::TandemResult;
use console::style;

/// Execute the start command
pub async fn execute(args: StartArgs, config: &Config) -> TandemResult<()> {
    let mut lifecycle = build_lifecycle(&args.session, config)?;

    let key = lifecycle.setup().await?.clone();
    let id = lifecycle.start().await?;

    println!(
        "{} Session {} started (cache key {})",
        style("✓").green(),
        style(id).cyan(),
        key
    );

    if args.wait {
        wait_ready(&mut lifecycle).await?;
    }

    Ok(())
}
