//! t2p - Todo and note CLI with local LLM enrichment.
//!
//! Main entry point: tracing setup, config load, command dispatch.

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use t2p_config::{Config, ConfigLoader};

mod cli;
mod cmd_note;
mod cmd_todo;

use cli::{Cli, Commands};

/// Initialize tracing with stderr and file output.
///
/// Log files are written to ~/.t2p/debug/ with daily rotation. The console
/// layer defaults to warnings only so command output stays clean; raise it
/// with RUST_LOG when debugging.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = Config::data_dir().join("debug");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("t2p")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer guard alive for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = init_tracing() {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = ConfigLoader::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "Configuration loaded");
    if let Some(user) = cli.user {
        config.user = Some(user);
    }

    match cli.command {
        Commands::Todo { action } => cmd_todo::run(action, &config, &config_path).await,
        Commands::Note { action } => cmd_note::run(action, &config).await,
    }
}
