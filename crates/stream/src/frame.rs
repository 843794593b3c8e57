//! Outbound frames
//!
//! The wire protocol is a plain text push channel: one snapshot frame at
//! connect time, then one text frame per log line. Liveness uses
//! protocol-level Ping/Pong rather than an application frame, so clients
//! that only care about lines never need to parse anything.

use tailview_tail::LogLine;
use tokio_tungstenite::tungstenite::Message;

/// A frame queued for delivery to one subscriber
#[derive(Debug, Clone)]
pub enum Frame {
    /// One-time recent-history payload, sent immediately after connect
    Snapshot(String),
    /// A single live log line
    Line(LogLine),
    /// Liveness probe (WebSocket protocol ping)
    Ping,
}

impl Frame {
    /// Convert into the WebSocket message that goes on the wire
    pub fn into_message(self) -> Message {
        match self {
            Frame::Snapshot(text) => Message::text(text),
            Frame::Line(line) => Message::text(line.as_str().to_owned()),
            Frame::Ping => Message::Ping(Vec::new().into()),
        }
    }

    /// Check if this is a liveness probe
    pub fn is_ping(&self) -> bool {
        matches!(self, Frame::Ping)
    }
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;
