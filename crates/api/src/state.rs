use std::sync::Arc;

use record_locking_core::registry::LockRegistry;
use record_locking_core::status::StatusQueryService;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Sole writer of lock state.
    pub registry: Arc<LockRegistry>,
    /// Read-side lock status queries.
    pub status: Arc<StatusQueryService>,
    /// Live WebSocket sessions.
    pub ws_manager: Arc<WsManager>,
}
