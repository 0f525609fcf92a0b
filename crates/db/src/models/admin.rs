//! Read-only views of the host's admin tables.

use sqlx::FromRow;

use super::DbId;

/// A row from `admin_permissions`, reached through the user's roles.
#[derive(Debug, Clone, FromRow)]
pub struct AdminPermission {
    pub action: String,
    pub subject: Option<String>,
}

/// Name columns of a row from `admin_users`.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserRow {
    pub id: DbId,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}
