use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Seconds between pings.
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Pings a peer may leave unanswered before its session is ended.
const MAX_MISSED_HEARTBEATS: u64 = 2;

/// Ping every socket on a fixed interval and evict the ones that stopped
/// answering.
///
/// An evicted socket's session ends as if the peer had closed it, so its
/// locks are released. The returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    let max_idle = Duration::from_secs(HEARTBEAT_INTERVAL_SECS * MAX_MISSED_HEARTBEATS);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;

            let evicted = ws_manager.evict_stale(max_idle).await;
            if !evicted.is_empty() {
                tracing::info!(count = evicted.len(), "Evicted unresponsive WebSocket connections");
            }

            let count = ws_manager.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            ws_manager.ping_all().await;
        }
    })
}
