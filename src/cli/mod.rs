use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Object-storage connectivity health checks and usage analytics
#[derive(Parser)]
#[command(name = "storage-health")]
#[command(about = "Object-storage connectivity health checks and usage analytics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Probe client↔storage, client↔backend and backend↔storage
    Health(commands::health::HealthCommand),
    /// Smoke-test every backend storage function
    Smoke(commands::smoke::SmokeCommand),
    /// Aggregate storage usage by category with a cost projection
    Analytics(commands::analytics::AnalyticsCommand),
    /// Refresh usage analytics periodically until interrupted
    Watch(commands::watch::WatchCommand),
    /// Show or update persisted storage settings
    Settings(commands::settings::SettingsCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Health(command) => command.run().await,
        Commands::Smoke(command) => command.run().await,
        Commands::Analytics(command) => command.run().await,
        Commands::Watch(command) => command.run().await,
        Commands::Settings(command) => command.run().await,
    }
}
