//! Subscriber management
//!
//! Each connected client gets a `Subscriber` instance that tracks:
//! - Unique ID for the connection
//! - Channel sender for async frame delivery
//! - Unanswered liveness probe count
//! - A cancellation token the dispatcher and prober use to evict it
//!
//! The `SubscriberRegistry` handles registration, removal, and
//! snapshot-based enumeration. Registration is idempotent and
//! unregistration is a no-op on an unknown id: the dispatcher, the
//! prober, and connection teardown legitimately race to remove the same
//! entry.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, StreamError};
use crate::frame::Frame;

/// Counter for generating unique subscriber IDs
static SUBSCRIBER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Default maximum number of concurrent subscribers
const DEFAULT_MAX_SUBSCRIBERS: usize = 256;

/// A single connected subscriber
#[derive(Debug)]
pub struct Subscriber {
    /// Unique identifier
    id: u64,
    /// Remote peer address (for logs)
    peer: SocketAddr,
    /// Channel sender for frame delivery
    sender: mpsc::Sender<Frame>,
    /// Probes sent since the last pong
    missed_probes: AtomicU32,
    /// Cancelled to force the connection task to close
    cancel: CancellationToken,
}

impl Subscriber {
    /// Create a new subscriber with a fresh unique id
    pub fn new(peer: SocketAddr, sender: mpsc::Sender<Frame>) -> Self {
        Self {
            id: SUBSCRIBER_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            peer,
            sender,
            missed_probes: AtomicU32::new(0),
            cancel: CancellationToken::new(),
        }
    }

    /// Get the subscriber ID
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the remote peer address
    #[inline]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Get a clone of the cancellation token for the connection task
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Force the connection task to close
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Queue a frame without blocking
    ///
    /// Returns false if the queue is full or the connection task is gone;
    /// either way the subscriber is stalled and should be evicted.
    #[inline]
    pub fn try_send(&self, frame: Frame) -> bool {
        self.sender.try_send(frame).is_ok()
    }

    /// Check if the connection task is still consuming frames
    #[inline]
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed() && !self.cancel.is_cancelled()
    }

    /// Number of probes sent since the last pong
    #[inline]
    pub fn missed_probes(&self) -> u32 {
        self.missed_probes.load(Ordering::Relaxed)
    }

    /// Record a probe being sent; returns the new unanswered count
    #[inline]
    pub fn record_probe(&self) -> u32 {
        self.missed_probes.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Reset the unanswered probe count (called when a pong arrives)
    #[inline]
    pub fn mark_responsive(&self) {
        self.missed_probes.store(0, Ordering::Relaxed);
    }
}

/// Tracks the live set of connected subscribers
#[derive(Debug)]
pub struct SubscriberRegistry {
    /// Active subscribers
    subscribers: RwLock<Vec<Arc<Subscriber>>>,
    /// Maximum concurrent subscribers
    max_subscribers: usize,
}

impl SubscriberRegistry {
    /// Create a registry with the given capacity
    pub fn new(max_subscribers: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            max_subscribers,
        }
    }

    /// Register a subscriber
    ///
    /// Idempotent: registering an id that is already present is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::MaxSubscribers`] when the registry is full.
    pub fn register(&self, subscriber: Arc<Subscriber>) -> Result<()> {
        let mut subscribers = self.subscribers.write();

        if subscribers.iter().any(|s| s.id() == subscriber.id()) {
            return Ok(());
        }

        if subscribers.len() >= self.max_subscribers {
            return Err(StreamError::MaxSubscribers {
                max: self.max_subscribers,
            });
        }

        subscribers.push(subscriber);
        Ok(())
    }

    /// Remove a subscriber by id
    ///
    /// A no-op on an unknown id. Returns whether an entry was removed.
    pub fn unregister(&self, id: u64) -> bool {
        let mut subscribers = self.subscribers.write();
        let original_len = subscribers.len();
        subscribers.retain(|s| s.id() != id);
        subscribers.len() != original_len
    }

    /// Point-in-time view of the current subscribers
    ///
    /// Safe to iterate while other tasks register and unregister; removed
    /// subscribers may still appear in an older snapshot, which callers
    /// tolerate because frame queues to closed tasks simply fail.
    pub fn snapshot(&self) -> Vec<Arc<Subscriber>> {
        self.subscribers.read().clone()
    }

    /// Number of active subscribers
    pub fn count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Check if there are any subscribers
    #[inline]
    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.read().is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUBSCRIBERS)
    }
}

#[cfg(test)]
#[path = "subscriber_test.rs"]
mod tests;
