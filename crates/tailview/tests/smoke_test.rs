//! Smoke tests for tailview
//!
//! These tests verify end-to-end functionality by running the real
//! pipeline (tailer → broadcaster → prober → stream server) against a
//! temp file and connecting real WebSocket clients.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use tailview_stream::{
    Broadcaster, Prober, StreamServer, StreamServerConfig, SubscriberRegistry,
};
use tailview_tail::{LogTailer, SnapshotReader, TailerConfig};

/// Time to wait for a frame that should arrive
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Time to wait for a frame that should NOT arrive
const QUIET_TIMEOUT: Duration = Duration::from_millis(300);

/// Start the tailer, broadcaster, prober, and stream server over `path`
///
/// Returns the cancellation token that stops the whole stack and the
/// shared registry.
async fn start_stack(
    path: &std::path::Path,
    port: u16,
    recent_lines: usize,
    probe_period: Duration,
) -> (CancellationToken, Arc<SubscriberRegistry>) {
    let cancel = CancellationToken::new();
    let registry = Arc::new(SubscriberRegistry::default());
    let (line_tx, line_rx) = mpsc::channel(256);

    let tailer = LogTailer::new(
        TailerConfig::new(path).with_poll_interval(Duration::from_millis(10)),
    );
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = tailer.run(line_tx, cancel).await;
        });
    }

    let broadcaster = Broadcaster::new(Arc::clone(&registry));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move { broadcaster.run(line_rx, cancel).await });
    }

    let prober = Prober::new(Arc::clone(&registry), probe_period);
    {
        let cancel = cancel.clone();
        tokio::spawn(async move { prober.run(cancel).await });
    }

    let server = StreamServer::new(
        StreamServerConfig {
            address: "127.0.0.1".into(),
            port,
            ..Default::default()
        },
        Arc::clone(&registry),
        SnapshotReader::new(path, recent_lines),
    );
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = server.run(cancel).await;
        });
    }

    // Give the listener and tailer time to start.
    tokio::time::sleep(Duration::from_millis(200)).await;

    (cancel, registry)
}

/// Append bytes to the file and flush
fn append(file: &NamedTempFile, bytes: &[u8]) {
    let mut f = std::fs::OpenOptions::new()
        .append(true)
        .open(file.path())
        .unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
}

/// Receive the next text frame, skipping protocol frames
async fn next_text(
    ws: &mut (impl Stream<Item = tokio_tungstenite::tungstenite::Result<Message>> + Unpin),
) -> String {
    loop {
        let message = timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed")
            .expect("read error");
        if let Message::Text(text) = message {
            return text.to_string();
        }
    }
}

#[tokio::test]
async fn test_subscriber_gets_snapshot_then_live_lines() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"a\nb\nc\n").unwrap();
    file.flush().unwrap();

    let (cancel, _registry) = start_stack(file.path(), 59213, 10, Duration::from_secs(10)).await;

    let (mut ws, _) = connect_async("ws://127.0.0.1:59213/").await.unwrap();

    // Snapshot first, exactly the file's recent history.
    assert_eq!(next_text(&mut ws).await, "a\nb\nc\n");

    // Then live lines as they are appended.
    append(&file, b"d\n");
    assert_eq!(next_text(&mut ws).await, "d\n");

    cancel.cancel();
}

#[tokio::test]
async fn test_snapshot_is_limited_to_recent_lines() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"a\nb\nc\n").unwrap();
    file.flush().unwrap();

    let (cancel, _registry) = start_stack(file.path(), 59214, 2, Duration::from_secs(10)).await;

    let (mut ws, _) = connect_async("ws://127.0.0.1:59214/").await.unwrap();
    assert_eq!(next_text(&mut ws).await, "b\nc\n");

    cancel.cancel();
}

#[tokio::test]
async fn test_two_subscribers_both_receive_one_frame() {
    let file = NamedTempFile::new().unwrap();

    let (cancel, registry) = start_stack(file.path(), 59215, 10, Duration::from_secs(10)).await;

    let (mut first, _) = connect_async("ws://127.0.0.1:59215/").await.unwrap();
    let (mut second, _) = connect_async("ws://127.0.0.1:59215/").await.unwrap();

    // Empty file: empty snapshots.
    assert_eq!(next_text(&mut first).await, "");
    assert_eq!(next_text(&mut second).await, "");
    assert_eq!(registry.count(), 2);

    append(&file, b"d\n");

    // Both receive the line exactly once.
    assert_eq!(next_text(&mut first).await, "d\n");
    assert_eq!(next_text(&mut second).await, "d\n");
    assert!(
        timeout(QUIET_TIMEOUT, first.next()).await.is_err(),
        "first subscriber received an unexpected extra frame"
    );
    assert!(
        timeout(QUIET_TIMEOUT, second.next()).await.is_err(),
        "second subscriber received an unexpected extra frame"
    );

    cancel.cancel();
}

#[tokio::test]
async fn test_disconnected_subscriber_is_unregistered() {
    let file = NamedTempFile::new().unwrap();

    let (cancel, registry) = start_stack(file.path(), 59216, 10, Duration::from_secs(10)).await;

    let (mut leaver, _) = connect_async("ws://127.0.0.1:59216/").await.unwrap();
    let (mut stayer, _) = connect_async("ws://127.0.0.1:59216/").await.unwrap();
    assert_eq!(next_text(&mut leaver).await, "");
    assert_eq!(next_text(&mut stayer).await, "");
    assert_eq!(registry.count(), 2);

    leaver.close(None).await.unwrap();
    // Drain until the close handshake completes.
    while let Ok(Some(Ok(_))) = timeout(RECV_TIMEOUT, leaver.next()).await {}
    tokio::time::sleep(Duration::from_millis(200)).await;

    // The registry saw the disconnect; the stayer still receives lines.
    assert_eq!(registry.count(), 1);
    append(&file, b"after\n");
    assert_eq!(next_text(&mut stayer).await, "after\n");

    cancel.cancel();
}

#[tokio::test]
async fn test_responsive_client_survives_probing() {
    let file = NamedTempFile::new().unwrap();

    // Probe fast so several rounds fit in the test.
    let (cancel, registry) = start_stack(file.path(), 59217, 10, Duration::from_millis(50)).await;

    // tokio-tungstenite answers pings automatically while the stream is
    // polled, so a client that keeps reading stays registered.
    let (mut ws, _) = connect_async("ws://127.0.0.1:59217/").await.unwrap();
    assert_eq!(next_text(&mut ws).await, "");

    // Keep polling for ~8 probe periods; pongs are only produced while
    // the client stream is being polled.
    let deadline = tokio::time::Instant::now() + Duration::from_millis(400);
    while tokio::time::Instant::now() < deadline {
        let _ = timeout(Duration::from_millis(50), ws.next()).await;
    }
    assert_eq!(registry.count(), 1);

    append(&file, b"still here\n");
    assert_eq!(next_text(&mut ws).await, "still here\n");

    cancel.cancel();
}
