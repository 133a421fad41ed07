use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::{watch, RwLock};

use drm_status::{SharedState, StatusBroadcast};

fn socket_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("drm-status-test-{}-{}.sock", std::process::id(), name))
}

#[tokio::test]
async fn two_clients_each_receive_their_own_snapshot_stream() {
    let path = socket_path("two-clients");
    let _ = std::fs::remove_file(&path);

    let state = Arc::new(RwLock::new(SharedState::new()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let broadcast = StatusBroadcast::new(path.clone(), state.clone());
    let server = tokio::spawn(async move { broadcast.serve(shutdown_rx).await });

    // Give the listener a moment to bind before dialing it.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client_a = UnixStream::connect(&path).await.unwrap();
    let client_b = UnixStream::connect(&path).await.unwrap();
    let mut reader_a = BufReader::new(client_a);
    let mut reader_b = BufReader::new(client_b);

    let mut line_a = String::new();
    let mut line_b = String::new();
    reader_a.read_line(&mut line_a).await.unwrap();
    reader_b.read_line(&mut line_b).await.unwrap();

    assert!(!line_a.trim().is_empty());
    assert!(!line_b.trim().is_empty());
    // Both clients are on the same 500ms tick, so they see the same
    // snapshot content for a tick they both received.
    assert_eq!(line_a, line_b);

    let _ = shutdown_tx.send(true);
    let _ = server.await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn server_keeps_broadcasting_after_one_client_disconnects() {
    let path = socket_path("disconnect");
    let _ = std::fs::remove_file(&path);

    let state = Arc::new(RwLock::new(SharedState::new()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let broadcast = StatusBroadcast::new(path.clone(), state.clone());
    let server = tokio::spawn(async move { broadcast.serve(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;

    let dropped = UnixStream::connect(&path).await.unwrap();
    let survivor = UnixStream::connect(&path).await.unwrap();
    let mut survivor_reader = BufReader::new(survivor);

    // Read one line to confirm the survivor is receiving, then drop the
    // other client mid-stream.
    let mut first = String::new();
    survivor_reader.read_line(&mut first).await.unwrap();
    assert!(!first.trim().is_empty());
    drop(dropped);

    // The survivor should keep receiving snapshots on the next tick even
    // though the other client vanished.
    let mut second = String::new();
    survivor_reader.read_line(&mut second).await.unwrap();
    assert!(!second.trim().is_empty());

    let _ = shutdown_tx.send(true);
    let _ = server.await;
    let _ = std::fs::remove_file(&path);
}
