//! tailview - live log tailing over WebSocket
//!
//! # Usage
//!
//! ```bash
//! # Run the server (default)
//! tailview
//! tailview --config configs/config.toml
//!
//! # Stream live lines from a running server
//! tailview tail
//! tailview tail --host 127.0.0.1 --port 9010
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tailview_config::LogFormat;

/// tailview - live log tailing over WebSocket
#[derive(Parser, Debug)]
#[command(name = "tailview")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Args that apply to serve when no subcommand is given
    /// Path to configuration file
    #[arg(short, long, default_value = "configs/config.toml")]
    config: std::path::PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the tailview server
    Serve(cmd::serve::ServeArgs),

    /// Stream live lines from a running server
    Tail(cmd::tail::TailArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Explicit subcommand
        Some(Command::Serve(args)) => cmd::serve::run(args).await,
        // Tail writes the stream to stdout and keeps logging out of it
        Some(Command::Tail(args)) => cmd::tail::run(args).await,
        // No subcommand = run server (default behavior)
        None => {
            let args = cmd::serve::ServeArgs {
                config: cli.config,
                log_level: cli.log_level,
            };
            cmd::serve::run(args).await
        }
    }
}

/// Initialize the tracing subscriber for logging
pub(crate) fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    match format {
        LogFormat::Console => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
