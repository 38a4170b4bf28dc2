//! Resume command - pick up the session started by another job

use super::{build_lifecycle, wait_ready};
use crate::cli::args::ResumeArgs;
use crate::config::Config;
use crate::error::{TandemError, TandemResult};
use console::style;

/// Execute the resume command
pub async fn execute(args: ResumeArgs, config: &Config) -> TandemResult<()> {
    let mut lifecycle = build_lifecycle(&args.session, config)?;
    let key = lifecycle.setup().await?.clone();

    if !lifecycle.resume().await? {
        if args.require {
            return Err(TandemError::NoActiveSession);
        }
        println!("{} No session found for {}", style("!").yellow(), key);
        return Ok(());
    }

    if let Some(id) = lifecycle.session_id() {
        println!("{} Session {} resumed", style("✓").green(), style(id).cyan());
    }

    if args.wait {
        wait_ready(&mut lifecycle).await?;
    }

    Ok(())
}
