//! Serve command - run the tailview server
//!
//! Wires the long-lived tasks together: the tail loop feeding the line
//! channel, the broadcaster fanning lines out to the registry, the
//! liveness prober, the WebSocket stream server, and (optionally) the
//! operator page server. Ctrl-c cancels everything.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use tailview_config::Config;
use tailview_stream::{
    Broadcaster, Prober, StreamServer, StreamServerConfig, SubscriberRegistry,
};
use tailview_tail::{LogTailer, SnapshotReader, TailerConfig};

/// Depth of the tailer → broadcaster line channel
const LINE_CHANNEL_SIZE: usize = 1024;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "configs/config.toml")]
    pub config: PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

/// Run the server until ctrl-c
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = Config::from_file(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let level = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.log.level.as_str());
    crate::init_logging(level, config.log.format)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting tailview");

    // Fail fast if the log file is not there; the tailer would also
    // report it, but a startup typo deserves an immediate exit.
    std::fs::metadata(&config.tail.path)
        .with_context(|| format!("cannot access log file '{}'", config.tail.path))?;

    let cancel = CancellationToken::new();
    let registry = Arc::new(SubscriberRegistry::new(config.stream.max_subscribers));
    let (line_tx, line_rx) = mpsc::channel(LINE_CHANNEL_SIZE);

    // Tail loop. A fatal file error ends this task alone; subscribers
    // keep their connections and the snapshot path keeps working.
    let tailer = LogTailer::new(
        TailerConfig::new(&config.tail.path).with_poll_interval(config.tail.poll_interval),
    );
    let tail_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tailer.run(line_tx, cancel).await {
                error!(error = %e, "tail reader failed");
            }
        })
    };

    // Broadcast fan-out.
    let broadcaster = Broadcaster::new(Arc::clone(&registry));
    let broadcast_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { broadcaster.run(line_rx, cancel).await })
    };

    // Liveness prober.
    let prober = Prober::new(Arc::clone(&registry), config.stream.probe_period);
    let probe_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { prober.run(cancel).await })
    };

    // WebSocket stream server.
    let server = StreamServer::new(
        StreamServerConfig {
            address: config.stream.address.clone(),
            port: config.stream.port,
            send_timeout: config.stream.send_timeout,
            queue_size: config.stream.queue_size,
        },
        Arc::clone(&registry),
        SnapshotReader::new(&config.tail.path, config.tail.recent_lines),
    );
    let server_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = server.run(cancel).await {
                error!(error = %e, "stream server failed");
            }
        })
    };

    // Operator page server.
    let http_task = if config.http.enabled {
        let state = tailview_http::AppState::new(config.stream.port);
        let addr = config.http.bind_address();
        let cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = tailview_http::serve(&addr, state, cancel).await {
                error!(error = %e, "page server failed");
            }
        }))
    } else {
        None
    };

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received");
    cancel.cancel();

    let _ = tail_task.await;
    let _ = broadcast_task.await;
    let _ = probe_task.await;
    let _ = server_task.await;
    if let Some(task) = http_task {
        let _ = task.await;
    }

    info!("tailview stopped");
    Ok(())
}
