//! Read access to the host's `admin_users` table.

use sqlx::PgPool;

use crate::models::admin::AdminUserRow;
use crate::models::DbId;

pub struct AdminUserRepo;

impl AdminUserRepo {
    /// Find an admin user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminUserRow>, sqlx::Error> {
        sqlx::query_as::<_, AdminUserRow>(
            "SELECT id::BIGINT AS id, firstname, lastname FROM admin_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
