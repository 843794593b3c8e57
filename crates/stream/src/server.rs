//! WebSocket stream server
//!
//! `StreamServer` listens on a TCP port and upgrades each connection to a
//! WebSocket subscriber. Connections move through three states:
//!
//! - `Connecting`: handshake, then the recent-lines snapshot is sent as a
//!   single text frame, exactly once.
//! - `Active`: the subscriber is registered and its task forwards queued
//!   frames to the socket, bounds every write with the send timeout, and
//!   watches inbound traffic for pongs and closes.
//! - `Closed`: unregistration runs in the task's single exit path on
//!   every outcome, so the registry never leaks an entry.
//!
//! # Protocol
//!
//! Server → Client:
//! - One snapshot text frame (concatenation of up to N recent lines)
//! - One text frame per appended log line, in tail order
//! - Protocol pings driven by the prober
//!
//! Client → Server frames are not part of the protocol; pongs feed the
//! liveness counter and anything else is ignored.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use tailview_tail::SnapshotReader;

use crate::error::{Result, StreamError};
use crate::frame::Frame;
use crate::subscriber::{Subscriber, SubscriberRegistry};

/// Server configuration
#[derive(Debug, Clone)]
pub struct StreamServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub address: String,
    /// Listen port
    pub port: u16,
    /// Bound on a single frame write
    pub send_timeout: Duration,
    /// Per-subscriber frame queue depth
    pub queue_size: usize,
}

impl Default for StreamServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".into(),
            port: 9010,
            send_timeout: Duration::from_secs(5),
            queue_size: 64,
        }
    }
}

impl StreamServerConfig {
    /// Create config with custom port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// WebSocket server for live line subscribers
pub struct StreamServer {
    /// Server configuration
    config: StreamServerConfig,
    /// The shared subscriber set
    registry: Arc<SubscriberRegistry>,
    /// Connect-time snapshot source
    snapshot: SnapshotReader,
}

impl StreamServer {
    /// Create a new stream server
    pub fn new(
        config: StreamServerConfig,
        registry: Arc<SubscriberRegistry>,
        snapshot: SnapshotReader,
    ) -> Self {
        Self {
            config,
            registry,
            snapshot,
        }
    }

    /// Run the accept loop until cancelled
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if the listener cannot be bound.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(StreamError::Io)?;

        info!(addr = %addr, "stream server listening");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("stream server cancelled");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let registry = Arc::clone(&self.registry);
                        let snapshot = self.snapshot.clone();
                        let config = self.config.clone();

                        tokio::spawn(async move {
                            if let Err(e) =
                                handle_connection(stream, peer, registry, snapshot, config).await
                            {
                                debug!(peer = %peer, error = %e, "subscriber connection ended");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                    }
                }
            }
        }
    }
}

/// Handle a single subscriber connection through its whole lifecycle
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    registry: Arc<SubscriberRegistry>,
    snapshot: SnapshotReader,
    config: StreamServerConfig,
) -> Result<()> {
    // Connecting: handshake, then the snapshot, exactly once.
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut source) = ws.split();

    let payload = snapshot.read_async().await?;
    sink.send(Frame::Snapshot(payload).into_message()).await?;

    // Active: join the registry and relay frames.
    let (tx, mut rx) = mpsc::channel(config.queue_size);
    let subscriber = Arc::new(Subscriber::new(peer, tx));

    if let Err(e) = registry.register(Arc::clone(&subscriber)) {
        warn!(peer = %peer, error = %e, "rejecting subscriber");
        let _ = sink.send(Message::Close(None)).await;
        return Err(e);
    }

    info!(
        subscriber_id = subscriber.id(),
        peer = %peer,
        subscribers = registry.count(),
        "subscriber connected"
    );

    let cancel = subscriber.cancel_token();

    loop {
        tokio::select! {
            // Evicted by the prober or the dispatcher.
            _ = cancel.cancelled() => {
                debug!(subscriber_id = subscriber.id(), "subscriber evicted");
                break;
            }

            // Frame queued by the dispatcher or the prober.
            frame = rx.recv() => match frame {
                Some(frame) => {
                    let message = frame.into_message();
                    match tokio::time::timeout(config.send_timeout, sink.send(message)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            warn!(
                                subscriber_id = subscriber.id(),
                                error = %e,
                                "failed to send frame"
                            );
                            break;
                        }
                        Err(_) => {
                            warn!(
                                subscriber_id = subscriber.id(),
                                timeout = ?config.send_timeout,
                                "frame send timed out"
                            );
                            break;
                        }
                    }
                }
                // Frame channel gone; nothing more to deliver.
                None => break,
            },

            // Inbound traffic: pongs feed liveness, closes end the session.
            incoming = source.next() => match incoming {
                Some(Ok(Message::Pong(_))) => {
                    subscriber.mark_responsive();
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!(subscriber_id = subscriber.id(), "subscriber closed connection");
                    break;
                }
                Some(Ok(_)) => {
                    // Client payload frames carry no meaning here.
                }
                Some(Err(e)) => {
                    debug!(subscriber_id = subscriber.id(), error = %e, "read error");
                    break;
                }
            }
        }
    }

    // Closed: the one exit path; unregister is idempotent because the
    // prober or dispatcher may already have removed the entry.
    registry.unregister(subscriber.id());
    let _ = sink.close().await;

    info!(
        subscriber_id = subscriber.id(),
        peer = %peer,
        subscribers = registry.count(),
        "subscriber disconnected"
    );

    Ok(())
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
