//! Broadcast fan-out
//!
//! `Broadcaster` consumes lines from the tailer's channel and fans each
//! one out to every registered subscriber. Delivery is a non-blocking
//! `try_send` into per-subscriber queues, so one slow connection never
//! delays the others and every subscriber sees lines in tail order. A
//! full queue means the connection task has stalled: that subscriber is
//! cancelled and unregistered, and the rest of the batch continues.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use tailview_tail::LogLine;

use crate::frame::Frame;
use crate::subscriber::SubscriberRegistry;

/// Fans tailed lines out to all registered subscribers
#[derive(Debug)]
pub struct Broadcaster {
    /// The shared subscriber set
    registry: Arc<SubscriberRegistry>,
    /// Total lines consumed from the tailer
    lines_seen: AtomicU64,
    /// Total frames queued to subscribers
    frames_sent: AtomicU64,
}

impl Broadcaster {
    /// Create a broadcaster over a registry
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            registry,
            lines_seen: AtomicU64::new(0),
            frames_sent: AtomicU64::new(0),
        }
    }

    /// Get the shared registry
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Fan one line out to every registered subscriber
    ///
    /// Returns the number of subscribers the line was queued to.
    /// Subscribers whose queue is full or closed are evicted here; the
    /// remaining deliveries are unaffected.
    pub fn dispatch(&self, line: &LogLine) -> usize {
        self.lines_seen.fetch_add(1, Ordering::Relaxed);

        let subscribers = self.registry.snapshot();
        if subscribers.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        for subscriber in subscribers {
            if subscriber.try_send(Frame::Line(line.clone())) {
                delivered += 1;
            } else {
                warn!(
                    subscriber_id = subscriber.id(),
                    peer = %subscriber.peer(),
                    "subscriber not keeping up, disconnecting"
                );
                subscriber.cancel();
                self.registry.unregister(subscriber.id());
            }
        }

        if delivered > 0 {
            self.frames_sent.fetch_add(delivered as u64, Ordering::Relaxed);
            trace!(delivered, "broadcast line to subscribers");
        }

        delivered
    }

    /// Consume lines until the channel closes or the token is cancelled
    pub async fn run(&self, mut rx: mpsc::Receiver<LogLine>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("broadcaster cancelled");
                    return;
                }
                line = rx.recv() => match line {
                    Some(line) => {
                        self.dispatch(&line);
                    }
                    None => {
                        debug!("line channel closed, broadcaster stopping");
                        return;
                    }
                }
            }
        }
    }

    /// Get broadcast statistics
    pub fn stats(&self) -> BroadcastStats {
        BroadcastStats {
            lines_seen: self.lines_seen.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            subscriber_count: self.registry.count(),
        }
    }
}

/// Statistics about the broadcaster
#[derive(Debug, Clone, Copy)]
pub struct BroadcastStats {
    /// Total lines consumed from the tailer
    pub lines_seen: u64,
    /// Total frames queued to subscribers
    pub frames_sent: u64,
    /// Current number of subscribers
    pub subscriber_count: usize,
}

#[cfg(test)]
#[path = "broadcaster_test.rs"]
mod tests;
