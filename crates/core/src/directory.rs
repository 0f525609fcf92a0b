//! Host-owned lookups the locking core consumes but never mutates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::permissions::Permission;
use crate::types::UserId;

/// Name fields of an admin user, as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: UserId,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl AdminUser {
    /// First and last name joined by a space. Missing or blank parts are
    /// skipped rather than rendered.
    pub fn display_name(&self) -> String {
        [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Source of a user's effective `{action, subject}` grants.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Grants held by `user_id` (through any of their roles) whose subject is
    /// `subject`.
    async fn permissions_for(
        &self,
        user_id: &UserId,
        subject: &str,
    ) -> Result<Vec<Permission>, BoxError>;
}

/// Resolves user ids to display information.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<AdminUser>, BoxError>;
}
