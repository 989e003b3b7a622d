//! Chronicler CLI — the main entry point.
//!
//! Commands:
//! - `channel`   — Archive one channel's history
//! - `category`  — Archive every text channel in a category
//! - `onboard`   — Initialize config & staging directory
//! - `status`    — Show effective configuration

use chronicler_config::{AppConfig, ConfigError};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

mod commands;

#[derive(Parser)]
#[command(
    name = "chronicler",
    about = "Chronicler — archive chat channels into transcripts and zip bundles",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive a single channel (name, <#id> mention, or id)
    Channel {
        channel: Option<String>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Archive every text channel in a category (name, <#id> mention, or id)
    Category {
        category: Option<String>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Initialize configuration and staging directory
    Onboard,

    /// Show effective configuration
    Status,
}

/// Options shared by the archive commands.
#[derive(Args, Clone)]
pub struct RunArgs {
    /// Guild snapshot to archive from
    #[arg(short, long, env = "CHRONICLER_GUILD")]
    pub guild: PathBuf,

    /// Directory delivered artifacts are copied to
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Staging directory (wiped before each channel)
    #[arg(long)]
    pub staging: Option<PathBuf>,

    /// Maximum deliverable file size in bytes (defaults to the server's limit)
    #[arg(long)]
    pub size_limit: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(
        &AppConfig::config_path(),
        env_filter(cli.verbose),
        std::io::stdout,
    )
    .map_err(|e| chronicler_core::Error::Config {
        message: e.to_string(),
    })?;

    // Initialize tracing
    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter(cli.verbose))
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(cli.verbose))
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Channel { channel, run } => {
            commands::archive::run(&config, chronicler_platform::Command::ArchiveChannel, channel, run)
                .await?
        }
        Commands::Category { category, run } => {
            commands::archive::run(&config, chronicler_platform::Command::ArchiveCategory, category, run)
                .await?
        }
        Commands::Onboard => commands::onboard::run(&config).await?,
        Commands::Status => commands::status::run(&config).await?,
    }

    Ok(())
}

fn env_filter(verbose: bool) -> EnvFilter {
    let filter = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter))
}

/// Load config under a scoped pretty subscriber. The configured log format
/// isn't known until the file is read.
fn load_config<W>(path: &Path, filter: EnvFilter, writer: W) -> Result<AppConfig, ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .finish();
    tracing::subscriber::with_default(bootstrap, || {
        AppConfig::load_with(path, |key| std::env::var(key).ok())
    })
}
