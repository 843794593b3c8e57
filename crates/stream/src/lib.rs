//! tailview Stream - live line broadcast over WebSocket
//!
//! This crate provides the subscriber-facing half of tailview:
//!
//! - Tracks the live set of connected subscribers with snapshot-safe
//!   enumeration under concurrent register/unregister
//! - Fans each tailed line out to every subscriber without letting one
//!   slow connection delay the others
//! - Evicts subscribers on delivery failure, full queues, or missed
//!   liveness probes - a failure affects only that one subscriber
//! - Replays the recent-lines snapshot to each client once at connect time
//!
//! # Architecture
//!
//! ```text
//! LogTailer
//!     │ mpsc<LogLine>
//!     ▼
//! Broadcaster ──► SubscriberRegistry ◄── Prober (ping sweep)
//!                     │                      ▲
//!                     │ per-subscriber       │ Pong resets
//!                     │ frame queues         │ missed count
//!                     ▼                      │
//!                connection tasks ───────────┘
//!                     │
//!                     ▼
//!                StreamServer (WebSocket) ──► clients
//! ```
//!
//! A connection moves through `Connecting` (handshake + one snapshot
//! frame) to `Active` (registered, receiving live frames) to `Closed`
//! (unregistered in the task's single exit path, so the registry cannot
//! leak an entry).

mod broadcaster;
mod error;
mod frame;
mod prober;
mod server;
mod subscriber;

pub use broadcaster::{BroadcastStats, Broadcaster};
pub use error::{Result, StreamError};
pub use frame::Frame;
pub use prober::Prober;
pub use server::{StreamServer, StreamServerConfig};
pub use subscriber::{Subscriber, SubscriberRegistry};
