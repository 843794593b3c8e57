//! Tail command - stream live lines from a running server
//!
//! Connects to the stream server as a plain WebSocket client and writes
//! every frame to stdout: first the recent-lines snapshot, then live
//! lines as they are appended. Pings are answered so the server's
//! liveness prober keeps the connection alive.

use anyhow::{Context, Result};
use clap::Args;
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Arguments for the tail command
#[derive(Args, Debug)]
pub struct TailArgs {
    /// Full WebSocket URL of a running server (overrides host/port)
    #[arg(long)]
    pub url: Option<String>,

    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server stream port
    #[arg(short, long, default_value_t = 9010)]
    pub port: u16,
}

/// Connect and print frames until the server closes the connection
pub async fn run(args: TailArgs) -> Result<()> {
    let url = args
        .url
        .unwrap_or_else(|| format!("ws://{}:{}/", args.host, args.port));

    let (ws, _response) = connect_async(url.as_str())
        .await
        .with_context(|| format!("connecting to {url}"))?;
    let (mut sink, mut source) = ws.split();

    let mut stdout = tokio::io::stdout();

    while let Some(message) = source.next().await {
        match message.context("reading from server")? {
            Message::Text(text) => {
                stdout.write_all(text.as_bytes()).await?;
                stdout.flush().await?;
            }
            Message::Ping(payload) => {
                sink.send(Message::Pong(payload)).await?;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    Ok(())
}
