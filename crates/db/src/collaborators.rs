//! Postgres-backed implementations of the core collaborator traits.

use async_trait::async_trait;
use record_locking_core::directory::{AdminUser, PermissionSource, UserDirectory};
use record_locking_core::error::BoxError;
use record_locking_core::locking::{LockFilter, LockRecord};
use record_locking_core::permissions::Permission;
use record_locking_core::store::LockStore;
use record_locking_core::types::UserId;

use crate::models::DbId;
use crate::repositories::{AdminPermissionRepo, AdminUserRepo, OpenEntityRepo};
use crate::DbPool;

/// Host admin ids are integers; anything else cannot match a row.
fn admin_id(user_id: &UserId) -> Option<DbId> {
    user_id.as_str().parse().ok()
}

// ---------------------------------------------------------------------------
// PgLockStore
// ---------------------------------------------------------------------------

/// Lock store backed by the `open_entities` table.
#[derive(Clone)]
pub struct PgLockStore {
    pool: DbPool,
}

impl PgLockStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LockStore for PgLockStore {
    async fn upsert(&self, record: LockRecord) -> Result<LockRecord, BoxError> {
        let row = OpenEntityRepo::upsert(&self.pool, &record).await?;
        Ok(row.into())
    }

    async fn find_one(&self, filter: &LockFilter) -> Result<Option<LockRecord>, BoxError> {
        let row = OpenEntityRepo::find_one(&self.pool, filter).await?;
        Ok(row.map(Into::into))
    }

    async fn find_many(&self, filter: &LockFilter) -> Result<Vec<LockRecord>, BoxError> {
        let rows = OpenEntityRepo::find_many(&self.pool, filter).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_many(&self, filter: &LockFilter) -> Result<u64, BoxError> {
        Ok(OpenEntityRepo::delete_many(&self.pool, filter).await?)
    }

    async fn count(&self, filter: &LockFilter) -> Result<u64, BoxError> {
        let count = OpenEntityRepo::count(&self.pool, filter).await?;
        Ok(u64::try_from(count)?)
    }
}

// ---------------------------------------------------------------------------
// PgPermissionSource
// ---------------------------------------------------------------------------

/// Reads grants from the host's admin permission and role link tables.
#[derive(Clone)]
pub struct PgPermissionSource {
    pool: DbPool,
}

impl PgPermissionSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionSource for PgPermissionSource {
    async fn permissions_for(
        &self,
        user_id: &UserId,
        subject: &str,
    ) -> Result<Vec<Permission>, BoxError> {
        let Some(id) = admin_id(user_id) else {
            tracing::debug!(user_id = %user_id, "Non-numeric user id has no admin permissions");
            return Ok(Vec::new());
        };

        let rows = AdminPermissionRepo::list_for_user_and_subject(&self.pool, id, subject).await?;
        Ok(rows
            .into_iter()
            .map(|row| Permission::new(row.action, row.subject.unwrap_or_default()))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// PgUserDirectory
// ---------------------------------------------------------------------------

/// Resolves holders against the host's `admin_users` table.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: DbPool,
}

impl PgUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<AdminUser>, BoxError> {
        let Some(id) = admin_id(user_id) else {
            return Ok(None);
        };

        let row = AdminUserRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(|row| AdminUser {
            id: UserId::from(row.id),
            firstname: row.firstname,
            lastname: row.lastname,
        }))
    }
}
