//! Error types for the stream crate

use std::io;
use thiserror::Error;

/// Errors that can occur in the stream system
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error (listener or socket operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// WebSocket handshake or frame error
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Connect-time snapshot could not be read
    #[error("snapshot failed: {0}")]
    Snapshot(#[from] tailview_tail::TailError),

    /// Maximum subscribers reached
    #[error("maximum subscribers reached ({max})")]
    MaxSubscribers { max: usize },
}

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, StreamError>;
