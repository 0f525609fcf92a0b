//! Unit tests for `WsManager`.
//!
//! These exercise the connection manager directly, without performing any
//! HTTP upgrades.

use std::time::Duration;

use axum::extract::ws::Message;
use record_locking_api::ws::WsManager;
use record_locking_core::types::UserId;

fn ada() -> UserId {
    UserId::from("1")
}

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn add_and_remove_track_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), ada()).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn remove_unknown_id_is_noop() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), ada()).await;
    manager.remove("nonexistent").await;

    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn send_to_reaches_only_the_named_connection() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string(), ada()).await;
    let mut rx2 = manager.add("conn-2".to_string(), UserId::from("2")).await;

    assert!(manager.send_to("conn-1", Message::Text("hello".into())).await);

    match rx1.try_recv() {
        Ok(Message::Text(text)) => assert_eq!(text.as_str(), "hello"),
        other => panic!("Expected text frame, got {other:?}"),
    }
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn send_to_unknown_connection_reports_false() {
    let manager = WsManager::new();

    assert!(!manager.send_to("missing", Message::Text("hello".into())).await);
}

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string(), ada()).await;
    let mut rx2 = manager.add("conn-2".to_string(), ada()).await;

    manager.ping_all().await;

    assert!(matches!(rx1.try_recv(), Ok(Message::Ping(_))));
    assert!(matches!(rx2.try_recv(), Ok(Message::Ping(_))));
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string(), ada()).await;
    let mut rx2 = manager.add("conn-2".to_string(), ada()).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx1.try_recv(), Ok(Message::Close(None))));
    assert!(matches!(rx2.try_recv(), Ok(Message::Close(None))));
}

#[tokio::test]
async fn evict_stale_drops_silent_connections_only() {
    let manager = WsManager::new();
    let mut silent = manager.add("silent".to_string(), ada()).await;
    let _live = manager.add("live".to_string(), ada()).await;

    tokio::time::sleep(Duration::from_millis(60)).await;
    manager.touch("live").await;

    let evicted = manager.evict_stale(Duration::from_millis(50)).await;

    assert_eq!(evicted, vec!["silent".to_string()]);
    assert_eq!(manager.connection_count().await, 1);
    // The evicted connection's outbound channel is closed.
    assert!(silent.recv().await.is_none());
}

#[tokio::test]
async fn fresh_connections_survive_eviction() {
    let manager = WsManager::new();
    let _rx = manager.add("conn-1".to_string(), ada()).await;

    let evicted = manager.evict_stale(Duration::from_secs(60)).await;

    assert!(evicted.is_empty());
    assert_eq!(manager.connection_count().await, 1);
}
