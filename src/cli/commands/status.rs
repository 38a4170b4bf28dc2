//! Status command - print the remote status of the run's session

use super::resume_required;
use crate::cli::args::SessionArgs;
use crate::config::Config;
use crate::error::TandemResult;
use crate::session::SessionStatus;
use console::style;

/// Execute the status command
pub async fn execute(args: SessionArgs, config: &Config) -> TandemResult<()> {
    let lifecycle = resume_required(&args, config).await?;
    let status = lifecycle.status().await?;

    let label = match &status {
        SessionStatus::Ready => style(status.to_string()).green(),
        SessionStatus::Swept => style(status.to_string()).red(),
        SessionStatus::Pending(_) => style(status.to_string()).yellow(),
    };

    if let Some(id) = lifecycle.session_id() {
        println!("{}: {}", style(id).cyan(), label);
    }

    Ok(())
}
