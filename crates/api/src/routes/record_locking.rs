//! Route definitions for the record-locking plugin surface.
//!
//! Every endpoint except the settings pair requires an `AuthUser`. The
//! WebSocket upgrade authenticates itself from the query string or header.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::record_locking;
use crate::state::AppState;
use crate::ws;

/// Record-locking routes mounted at `/record-locking`.
///
/// ```text
/// GET    /settings                                        -> get_settings
/// GET    /log-settings                                    -> get_log_settings
/// GET    /get-status/{entity_document_id}                 -> get_status_by_document
/// GET    /get-status/{entity_id}/{entity_document_id}     -> get_status_by_entity_and_document
/// POST   /set-status/{entity_id}/{entity_document_id}     -> set_status
/// DELETE /delete-status/{entity_id}/{entity_document_id}  -> delete_status
/// GET    /ws                                              -> WebSocket upgrade
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(record_locking::get_settings))
        .route("/log-settings", get(record_locking::get_log_settings))
        .route(
            "/get-status/{entity_document_id}",
            get(record_locking::get_status_by_document),
        )
        .route(
            "/get-status/{entity_id}/{entity_document_id}",
            get(record_locking::get_status_by_entity_and_document),
        )
        .route(
            "/set-status/{entity_id}/{entity_document_id}",
            post(record_locking::set_status),
        )
        .route(
            "/delete-status/{entity_id}/{entity_document_id}",
            delete(record_locking::delete_status),
        )
        .route("/ws", get(ws::ws_handler))
}
