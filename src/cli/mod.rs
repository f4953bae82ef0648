use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Delivery metrics from issue tracker data
#[derive(Parser)]
#[command(name = "delivery-metrics")]
#[command(about = "Defect, net flow and waste metrics for agile delivery teams")]
#[command(version)]
pub struct Cli {
    /// Log progress at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Calculate every configured metric and write its charts
    Run(commands::run::RunCommand),
    /// Calculate a single metric and print it
    Analyse(commands::analysis::AnalyseCommand),
    /// Print the effective configuration as TOML
    Config(commands::config::ConfigCommand),
}

pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise "error", or "info" with --verbose
    let default_level = if cli.verbose { "info" } else { "error" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();

    match cli.command {
        Commands::Run(command) => command.run(),
        Commands::Analyse(command) => command.run(),
        Commands::Config(command) => command.run(),
    }
}
