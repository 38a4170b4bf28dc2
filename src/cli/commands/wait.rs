//! Wait command - block until the run's session is ready

use super::{resume_required, wait_ready};
use crate::cli::args::SessionArgs;
use crate::config::Config;
use crate::error::TandemResult;

/// Execute the wait command
pub async fn execute(args: SessionArgs, config: &Config) -> TandemResult<()> {
    let mut lifecycle = resume_required(&args, config).await?;
    wait_ready(&mut lifecycle).await
}
