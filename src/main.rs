//! Tandem - shared CI sessions
//!
//! CLI entry point that dispatches to subcommands.

use clap::{CommandFactory, Parser};
use console::style;
use std::process::ExitCode;
use tandem::cli::{Cli, Commands};
use tandem::config::ConfigManager;
use tandem::error::TandemResult;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> TandemResult<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "tandem", &mut std::io::stdout());
        return Ok(());
    }

    let config_manager = ConfigManager::locate(cli.config.clone());
    let config = config_manager.load().await?;

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("tandem=warn"),
        1 => EnvFilter::new("tandem=info"),
        _ => EnvFilter::new("tandem=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Completions { .. } => unreachable!("Completions handled above"),
        Commands::Key(args) => tandem::cli::commands::key(args, &config).await,
        Commands::Start(args) => tandem::cli::commands::start(args, &config).await,
        Commands::Resume(args) => tandem::cli::commands::resume(args, &config).await,
        Commands::Wait(args) => tandem::cli::commands::wait(args, &config).await,
        Commands::Up(args) => tandem::cli::commands::up(args, &config).await,
        Commands::Status(args) => tandem::cli::commands::status(args, &config).await,
        Commands::Config(args) => {
            tandem::cli::commands::config(args, &config_manager, &config).await
        }
    }
}
