//! Liveness probing
//!
//! `Prober` periodically walks the registry and queues a protocol ping to
//! every subscriber. The connection task forwards the ping and resets the
//! subscriber's unanswered count when a pong comes back. A subscriber
//! that enters a sweep with two unanswered probes is evicted, so an
//! unresponsive client is removed within one period of its second missed
//! probe.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::frame::Frame;
use crate::subscriber::SubscriberRegistry;

/// Unanswered probes after which a subscriber is evicted
const MAX_MISSED_PROBES: u32 = 2;

/// Periodically probes subscribers and evicts unresponsive ones
#[derive(Debug)]
pub struct Prober {
    /// The shared subscriber set
    registry: Arc<SubscriberRegistry>,
    /// Interval between sweeps
    period: Duration,
}

impl Prober {
    /// Create a prober over a registry
    pub fn new(registry: Arc<SubscriberRegistry>, period: Duration) -> Self {
        Self { registry, period }
    }

    /// Run one probe sweep
    ///
    /// Returns the number of subscribers evicted. Enumerates a registry
    /// snapshot, so concurrent register/unregister is fine.
    pub fn sweep(&self) -> usize {
        let subscribers = self.registry.snapshot();
        if subscribers.is_empty() {
            return 0;
        }

        debug!(count = subscribers.len(), "probing subscribers");

        let mut evicted = 0;
        for subscriber in subscribers {
            if subscriber.missed_probes() >= MAX_MISSED_PROBES {
                info!(
                    subscriber_id = subscriber.id(),
                    peer = %subscriber.peer(),
                    "subscriber failed liveness probes, evicting"
                );
                subscriber.cancel();
                if self.registry.unregister(subscriber.id()) {
                    evicted += 1;
                }
                continue;
            }

            let pending = subscriber.record_probe();
            if !subscriber.try_send(Frame::Ping) {
                // Queue full or task gone: stalled either way.
                warn!(
                    subscriber_id = subscriber.id(),
                    peer = %subscriber.peer(),
                    "could not queue probe, disconnecting"
                );
                subscriber.cancel();
                if self.registry.unregister(subscriber.id()) {
                    evicted += 1;
                }
            } else {
                debug!(subscriber_id = subscriber.id(), pending, "probe queued");
            }
        }

        evicted
    }

    /// Run probe sweeps until cancelled
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.period);
        // The first tick fires immediately; a probe right after startup
        // is harmless.
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("prober cancelled");
                    return;
                }
                _ = interval.tick() => {
                    self.sweep();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "prober_test.rs"]
mod tests;
