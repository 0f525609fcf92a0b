//! The lock registry: sole owner of lock state.
//!
//! Every mutation of lock records goes through [`LockRegistry`]. Operations on
//! the same `(user, entity, document)` triple are serialized through a
//! per-triple guard; operations on different triples run independently.

use std::collections::HashSet;
use std::sync::Arc;

use crate::directory::PermissionSource;
use crate::error::{Collaborator, CoreError};
use crate::guards::TripleGuards;
use crate::locking::{LockFilter, LockKey, LockRecord, LockTarget};
use crate::permissions::can_lock;
use crate::store::LockStore;
use crate::types::UserId;

pub struct LockRegistry {
    store: Arc<dyn LockStore>,
    permissions: Arc<dyn PermissionSource>,
    guards: TripleGuards,
}

impl LockRegistry {
    pub fn new(store: Arc<dyn LockStore>, permissions: Arc<dyn PermissionSource>) -> Self {
        Self {
            store,
            permissions,
            guards: TripleGuards::new(),
        }
    }

    /// Discard every lock left over from a previous run.
    ///
    /// No connection survives a restart, so nothing in the store can still be
    /// valid. Call once before serving traffic.
    pub async fn init(&self) -> Result<u64, CoreError> {
        let discarded = self.release_all().await?;
        tracing::info!(discarded, "Lock registry initialised");
        Ok(discarded)
    }

    /// Nothing to flush: lock state does not outlive the process.
    pub async fn shutdown(&self) {
        tracing::debug!("Lock registry shut down");
    }

    /// Take (or refresh) the lock for `user_id` on `target`.
    ///
    /// Fails with [`CoreError::PermissionDenied`] when the user lacks a
    /// create/delete/publish grant on the entity; the store is untouched in
    /// that case. Re-acquiring replaces the existing record, so a triple never
    /// has more than one.
    pub async fn acquire(
        &self,
        user_id: &UserId,
        target: &LockTarget,
        connection_id: Option<&str>,
    ) -> Result<(), CoreError> {
        let grants = self
            .permissions
            .permissions_for(user_id, &target.entity_id)
            .await
            .map_err(CoreError::collaborator(Collaborator::PermissionService))?;

        if !can_lock(&grants, &target.entity_id) {
            tracing::debug!(
                user_id = %user_id,
                entity_id = %target.entity_id,
                entity_document_id = %target.entity_document_id,
                "User lacks permission to lock this entity"
            );
            return Err(CoreError::PermissionDenied {
                user_id: user_id.clone(),
                entity_id: target.entity_id.clone(),
            });
        }

        let key = LockKey::new(user_id, target);
        let _guard = self.guards.lock(&key).await;

        self.store
            .upsert(LockRecord::new(user_id, target, connection_id))
            .await
            .map_err(CoreError::collaborator(Collaborator::LockStore))?;

        tracing::info!(
            user_id = %user_id,
            entity_id = %target.entity_id,
            entity_document_id = %target.entity_document_id,
            connection_id = connection_id.unwrap_or("-"),
            "Lock acquired"
        );
        Ok(())
    }

    /// Drop the lock for one triple. Releasing an absent lock is not an error.
    pub async fn release(&self, user_id: &UserId, target: &LockTarget) -> Result<u64, CoreError> {
        let key = LockKey::new(user_id, target);
        let _guard = self.guards.lock(&key).await;

        let removed = self
            .store
            .delete_many(&LockFilter::for_key(&key))
            .await
            .map_err(CoreError::collaborator(Collaborator::LockStore))?;

        tracing::debug!(
            user_id = %user_id,
            entity_id = %target.entity_id,
            entity_document_id = %target.entity_document_id,
            removed,
            "Lock released"
        );
        Ok(removed)
    }

    /// Drop every lock created by `connection_id`.
    ///
    /// Each triple is cleared under its own guard, and only rows still carrying
    /// this connection id are removed, so a concurrent re-acquire from a newer
    /// session survives.
    pub async fn release_by_connection(&self, connection_id: &str) -> Result<u64, CoreError> {
        let owned = self
            .store
            .find_many(&LockFilter::all().connection(connection_id))
            .await
            .map_err(CoreError::collaborator(Collaborator::LockStore))?;

        let keys: HashSet<LockKey> = owned.iter().map(LockRecord::key).collect();
        let mut removed = 0;
        for key in &keys {
            let _guard = self.guards.lock(key).await;
            removed += self
                .store
                .delete_many(&LockFilter::for_key(key).connection(connection_id))
                .await
                .map_err(CoreError::collaborator(Collaborator::LockStore))?;
        }

        tracing::debug!(connection_id, removed, "Released locks for closed connection");
        Ok(removed)
    }

    /// Clear the whole registry, including REST-acquired locks.
    pub async fn release_all(&self) -> Result<u64, CoreError> {
        let removed = self
            .store
            .delete_many(&LockFilter::all())
            .await
            .map_err(CoreError::collaborator(Collaborator::LockStore))?;
        tracing::debug!(removed, "Released all locks");
        Ok(removed)
    }

    /// First lock matching `filter`, if any.
    pub async fn find_holder(&self, filter: &LockFilter) -> Result<Option<LockRecord>, CoreError> {
        self.store
            .find_one(filter)
            .await
            .map_err(CoreError::collaborator(Collaborator::LockStore))
    }

    /// Number of live locks.
    pub async fn lock_count(&self) -> Result<u64, CoreError> {
        self.store
            .count(&LockFilter::all())
            .await
            .map_err(CoreError::collaborator(Collaborator::LockStore))
    }
}
