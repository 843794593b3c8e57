//! Tests for liveness probing

use super::*;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::subscriber::Subscriber;

fn make_subscriber(queue: usize) -> (Arc<Subscriber>, mpsc::Receiver<Frame>) {
    let (tx, rx) = mpsc::channel(queue);
    let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    (Arc::new(Subscriber::new(peer, tx)), rx)
}

#[tokio::test]
async fn test_sweep_queues_ping() {
    let registry = Arc::new(SubscriberRegistry::default());
    let prober = Prober::new(Arc::clone(&registry), Duration::from_secs(10));

    let (sub, mut rx) = make_subscriber(4);
    registry.register(Arc::clone(&sub)).unwrap();

    assert_eq!(prober.sweep(), 0);
    assert!(rx.try_recv().unwrap().is_ping());
    assert_eq!(sub.missed_probes(), 1);
}

#[tokio::test]
async fn test_responsive_subscriber_survives_sweeps() {
    let registry = Arc::new(SubscriberRegistry::default());
    let prober = Prober::new(Arc::clone(&registry), Duration::from_secs(10));

    let (sub, mut rx) = make_subscriber(8);
    registry.register(Arc::clone(&sub)).unwrap();

    for _ in 0..5 {
        assert_eq!(prober.sweep(), 0);
        assert!(rx.try_recv().unwrap().is_ping());
        // The connection task saw a pong.
        sub.mark_responsive();
    }

    assert_eq!(registry.count(), 1);
    assert!(sub.is_connected());
}

#[tokio::test]
async fn test_two_missed_probes_evict_on_third_sweep() {
    let registry = Arc::new(SubscriberRegistry::default());
    let prober = Prober::new(Arc::clone(&registry), Duration::from_secs(10));

    let (sub, _rx) = make_subscriber(8);
    registry.register(Arc::clone(&sub)).unwrap();

    // Two sweeps with no pong: still registered, two probes pending.
    assert_eq!(prober.sweep(), 0);
    assert_eq!(prober.sweep(), 0);
    assert_eq!(registry.count(), 1);
    assert_eq!(sub.missed_probes(), 2);

    // Third sweep evicts.
    assert_eq!(prober.sweep(), 1);
    assert_eq!(registry.count(), 0);
    assert!(sub.cancel_token().is_cancelled());
}

#[tokio::test]
async fn test_unqueueable_probe_evicts_immediately() {
    let registry = Arc::new(SubscriberRegistry::default());
    let prober = Prober::new(Arc::clone(&registry), Duration::from_secs(10));

    // Zero-capacity queue is not possible with mpsc; use a full one.
    let (sub, _rx) = make_subscriber(1);
    sub.try_send(Frame::Ping);
    registry.register(Arc::clone(&sub)).unwrap();

    assert_eq!(prober.sweep(), 1);
    assert_eq!(registry.count(), 0);
}

#[tokio::test]
async fn test_sweep_with_empty_registry() {
    let registry = Arc::new(SubscriberRegistry::default());
    let prober = Prober::new(registry, Duration::from_secs(10));
    assert_eq!(prober.sweep(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_sweeps_on_schedule() {
    let registry = Arc::new(SubscriberRegistry::default());
    let (sub, mut rx) = make_subscriber(16);
    registry.register(Arc::clone(&sub)).unwrap();

    let prober = Arc::new(Prober::new(Arc::clone(&registry), Duration::from_secs(10)));
    let cancel = CancellationToken::new();

    let worker = {
        let prober = Arc::clone(&prober);
        let cancel = cancel.clone();
        tokio::spawn(async move { prober.run(cancel).await })
    };

    // First tick is immediate, then one per period. Advance two periods
    // and expect three pings (the subscriber stays responsive).
    for _ in 0..3 {
        let frame = timeout(Duration::from_secs(30), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(frame.is_ping());
        sub.mark_responsive();
    }

    cancel.cancel();
    worker.await.unwrap();
}
