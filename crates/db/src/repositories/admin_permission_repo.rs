//! Read access to the host's `admin_permissions` table.

use sqlx::PgPool;

use crate::models::admin::AdminPermission;
use crate::models::DbId;

/// Looks up permissions granted to admin users through their roles.
pub struct AdminPermissionRepo;

impl AdminPermissionRepo {
    /// Permissions held by `user_id` on `subject`, via any of the user's roles.
    pub async fn list_for_user_and_subject(
        pool: &PgPool,
        user_id: DbId,
        subject: &str,
    ) -> Result<Vec<AdminPermission>, sqlx::Error> {
        sqlx::query_as::<_, AdminPermission>(
            "SELECT DISTINCT p.action, p.subject \
             FROM admin_permissions AS p \
             INNER JOIN admin_permissions_role_lnk AS prl ON p.id = prl.permission_id \
             INNER JOIN admin_users_roles_lnk AS url ON prl.role_id = url.role_id \
             WHERE url.user_id = $1 AND p.subject = $2",
        )
        .bind(user_id)
        .bind(subject)
        .fetch_all(pool)
        .await
    }
}
