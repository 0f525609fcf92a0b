//! In-process implementations of the collaborator traits.
//!
//! [`MemoryLockStore`] is a complete lock store for single-process
//! deployments. [`StaticPermissions`] and [`StaticDirectory`] serve fixed
//! data and are mainly useful for embedding and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::directory::{AdminUser, PermissionSource, UserDirectory};
use crate::error::BoxError;
use crate::locking::{LockFilter, LockRecord};
use crate::permissions::Permission;
use crate::store::LockStore;
use crate::types::UserId;

// ---------------------------------------------------------------------------
// MemoryLockStore
// ---------------------------------------------------------------------------

/// Lock records kept in insertion order.
#[derive(Default)]
pub struct MemoryLockStore {
    records: RwLock<Vec<LockRecord>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn upsert(&self, record: LockRecord) -> Result<LockRecord, BoxError> {
        let mut records = self.records.write().await;
        let key = record.key();
        match records.iter_mut().find(|r| r.key() == key) {
            Some(existing) => {
                existing.connection_id = record.connection_id.clone();
                existing.created_at = record.created_at;
            }
            None => records.push(record.clone()),
        }
        Ok(record)
    }

    async fn find_one(&self, filter: &LockFilter) -> Result<Option<LockRecord>, BoxError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| filter.matches(r))
            .cloned())
    }

    async fn find_many(&self, filter: &LockFilter) -> Result<Vec<LockRecord>, BoxError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn delete_many(&self, filter: &LockFilter) -> Result<u64, BoxError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !filter.matches(r));
        Ok((before - records.len()) as u64)
    }

    async fn count(&self, filter: &LockFilter) -> Result<u64, BoxError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .count() as u64)
    }
}

// ---------------------------------------------------------------------------
// StaticPermissions
// ---------------------------------------------------------------------------

/// A fixed table of grants per user.
#[derive(Debug, Default, Clone)]
pub struct StaticPermissions {
    grants: HashMap<UserId, Vec<Permission>>,
}

impl StaticPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, user_id: impl Into<UserId>, action: &str, subject: &str) -> Self {
        self.grants
            .entry(user_id.into())
            .or_default()
            .push(Permission::new(action, subject));
        self
    }
}

#[async_trait]
impl PermissionSource for StaticPermissions {
    async fn permissions_for(
        &self,
        user_id: &UserId,
        subject: &str,
    ) -> Result<Vec<Permission>, BoxError> {
        Ok(self
            .grants
            .get(user_id)
            .map(|grants| {
                grants
                    .iter()
                    .filter(|p| p.subject == subject)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// StaticDirectory
// ---------------------------------------------------------------------------

/// A fixed set of known admin users.
#[derive(Debug, Default, Clone)]
pub struct StaticDirectory {
    users: HashMap<UserId, AdminUser>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: impl Into<UserId>, firstname: &str, lastname: &str) -> Self {
        let id = id.into();
        self.users.insert(
            id.clone(),
            AdminUser {
                id,
                firstname: Some(firstname.to_string()),
                lastname: Some(lastname.to_string()),
            },
        );
        self
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<AdminUser>, BoxError> {
        Ok(self.users.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locking::LockTarget;

    fn record(user: &str, doc: &str, conn: Option<&str>) -> LockRecord {
        let target = LockTarget::new("api::article.article", doc).unwrap();
        LockRecord::new(&UserId::from(user), &target, conn)
    }

    #[tokio::test]
    async fn find_one_returns_oldest_match() {
        let store = MemoryLockStore::new();
        store.upsert(record("1", "d", None)).await.unwrap();
        store.upsert(record("2", "d", None)).await.unwrap();

        let found = store
            .find_one(&LockFilter::all().document("d"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, UserId::from("1"));
    }

    #[tokio::test]
    async fn upsert_refreshes_existing_triple_in_place() {
        let store = MemoryLockStore::new();
        store.upsert(record("1", "d", Some("c1"))).await.unwrap();
        store.upsert(record("2", "d", None)).await.unwrap();
        store.upsert(record("1", "d", Some("c2"))).await.unwrap();

        let all = store.find_many(&LockFilter::all()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_id, UserId::from("1"));
        assert_eq!(all[0].connection_id.as_deref(), Some("c2"));
    }

    #[tokio::test]
    async fn delete_many_reports_removed_count() {
        let store = MemoryLockStore::new();
        store.upsert(record("1", "a", Some("c1"))).await.unwrap();
        store.upsert(record("1", "b", Some("c1"))).await.unwrap();
        store.upsert(record("2", "a", Some("c2"))).await.unwrap();

        let removed = store
            .delete_many(&LockFilter::all().connection("c1"))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count(&LockFilter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn static_permissions_filter_by_subject() {
        let perms = StaticPermissions::new()
            .grant("1", "plugin::content-manager.explorer.create", "api::article.article")
            .grant("1", "plugin::content-manager.explorer.read", "api::page.page");

        let grants = perms
            .permissions_for(&UserId::from("1"), "api::article.article")
            .await
            .unwrap();
        assert_eq!(grants.len(), 1);
        assert!(perms
            .permissions_for(&UserId::from("2"), "api::article.article")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn static_directory_resolves_known_users_only() {
        let dir = StaticDirectory::new().with_user("1", "Ada", "Lovelace");
        let user = dir.find_user(&UserId::from("1")).await.unwrap().unwrap();
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert!(dir.find_user(&UserId::from("9")).await.unwrap().is_none());
    }
}
