//! Key command - print the cache key for this job

use super::key_builder;
use crate::cli::args::SessionArgs;
use crate::config::Config;
use crate::error::TandemResult;

/// Execute the key command
pub async fn execute(args: SessionArgs, config: &Config) -> TandemResult<()> {
    let key = key_builder(&args, config).build_key().await?;
    println!("{}", key);
    Ok(())
}
