//! Up command - resume or start the run's session, then wait for it

use super::{build_lifecycle, wait_ready};
use crate::cli::args::SessionArgs;
use crate::config::Config;
use crate::error::TandemResult;
use console::style;

/// Execute the up command
pub async fn execute(args: SessionArgs, config: &Config) -> TandemResult<()> {
    let mut lifecycle = build_lifecycle(&args, config)?;
    lifecycle.setup().await?;

    let id = lifecycle.connect().await?;
    println!("{} Using session {}", style("✓").green(), style(id).cyan());

    wait_ready(&mut lifecycle).await
}
