//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Tandem - share one remote session across CI jobs
///
/// Jobs of the same workflow run, OS image and runtime version derive the
/// same cache key; the first job starts the session, the rest resume it.
#[derive(Parser, Debug)]
#[command(name = "tandem")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TANDEM_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the cache key for this job
    Key(SessionArgs),

    /// Create a new session and publish its id
    Start(StartArgs),

    /// Resume the session started by another job of this run
    Resume(ResumeArgs),

    /// Resume the run's session and wait until it is ready
    Wait(SessionArgs),

    /// Resume the run's session, starting one if needed, then wait until ready
    Up(SessionArgs),

    /// Resume the run's session and print its status
    Status(SessionArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Run identity and endpoint overrides shared by session commands
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Workflow run identifier
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: u64,

    /// Runner OS image identifier
    #[arg(long, env = "ImageOS")]
    pub os_image: String,

    /// Base URL of the session API
    #[arg(long, env = "TANDEM_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the session API
    #[arg(long, env = "TANDEM_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Shared cache directory
    #[arg(long, env = "TANDEM_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Arguments for the start command
#[derive(Parser, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Wait until the session is ready
    #[arg(short, long)]
    pub wait: bool,
}

/// Arguments for the resume command
#[derive(Parser, Debug)]
pub struct ResumeArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Wait until the session is ready
    #[arg(short, long)]
    pub wait: bool,

    /// Fail when no session has been started for this run
    #[arg(long)]
    pub require: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
