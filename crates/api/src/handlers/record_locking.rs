//! Handlers for the record-locking REST surface.
//!
//! Status endpoints tell the admin UI whether someone else has a document
//! open. The set/delete endpoints let clients without a socket hold locks
//! directly.

use axum::extract::{Path, State};
use axum::Json;
use record_locking_core::error::CoreError;
use record_locking_core::locking::{validate_document_id, LockTarget};
use record_locking_core::settings::{LogSettings, TransportSettings};
use record_locking_core::status::HolderInfo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body returned by the status endpoints: the holder, or literal `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LockStatus {
    Locked(HolderInfo),
    Unlocked(bool),
}

impl From<Option<HolderInfo>> for LockStatus {
    fn from(holder: Option<HolderInfo>) -> Self {
        match holder {
            Some(holder) => LockStatus::Locked(holder),
            None => LockStatus::Unlocked(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// GET /record-locking/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<TransportSettings> {
    Json(TransportSettings {
        transports: state.config.locking.transports.clone(),
    })
}

/// GET /record-locking/log-settings
pub async fn get_log_settings(State(state): State<AppState>) -> Json<LogSettings> {
    Json(LogSettings {
        log_level: state.config.locking.log_level,
        enable_logging: state.config.locking.enable_logging,
    })
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /record-locking/get-status/{entity_document_id}
///
/// Whether anyone other than the caller holds a lock on the document,
/// regardless of entity type.
pub async fn get_status_by_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(entity_document_id): Path<String>,
) -> AppResult<Json<LockStatus>> {
    validate_document_id(&entity_document_id)?;

    let holder = state
        .status
        .status_by_document(&entity_document_id, &auth.user_id)
        .await?;
    Ok(Json(holder.into()))
}

/// GET /record-locking/get-status/{entity_id}/{entity_document_id}
pub async fn get_status_by_entity_and_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((entity_id, entity_document_id)): Path<(String, String)>,
) -> AppResult<Json<LockStatus>> {
    let target = LockTarget::new(entity_id, entity_document_id)?;

    let holder = state
        .status
        .status_by_entity_and_document(
            &target.entity_id,
            &target.entity_document_id,
            &auth.user_id,
        )
        .await?;
    Ok(Json(holder.into()))
}

// ---------------------------------------------------------------------------
// Explicit lock management
// ---------------------------------------------------------------------------

/// POST /record-locking/set-status/{entity_id}/{entity_document_id}
///
/// Acquire a lock with no owning connection. Responds `false` when the caller
/// may not lock this entity type; such locks survive until deleted or until
/// the service restarts.
pub async fn set_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((entity_id, entity_document_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    let target = LockTarget::new(entity_id, entity_document_id)?;

    match state.registry.acquire(&auth.user_id, &target, None).await {
        Ok(()) => Ok(Json(true)),
        Err(CoreError::PermissionDenied { .. }) => Ok(Json(false)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /record-locking/delete-status/{entity_id}/{entity_document_id}
///
/// Release the caller's lock. Succeeds whether or not a lock existed.
pub async fn delete_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((entity_id, entity_document_id)): Path<(String, String)>,
) -> AppResult<Json<&'static str>> {
    let target = LockTarget::new(entity_id, entity_document_id)?;

    state.registry.release(&auth.user_id, &target).await?;
    Ok(Json("DELETED"))
}
