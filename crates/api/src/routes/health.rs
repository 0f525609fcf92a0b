use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Locks currently recorded, or `null` when the lock store is unreachable.
    pub active_locks: Option<u64>,
    /// Open WebSocket sessions.
    pub ws_connections: usize,
}

/// GET /health -- returns service and lock store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_locks = match state.registry.lock_count().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Lock store health check failed");
            None
        }
    };

    let status = if active_locks.is_some() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        active_locks,
        ws_connections: state.ws_manager.connection_count().await,
    })
}

/// Mount health check routes (root level, outside `/record-locking`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
