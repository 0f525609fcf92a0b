//! Rows of the `open_entities` table.

use record_locking_core::locking::LockRecord;
use record_locking_core::types::{Timestamp, UserId};
use sqlx::FromRow;

use super::DbId;

/// A row from the `open_entities` table.
#[derive(Debug, Clone, FromRow)]
pub struct OpenEntity {
    pub id: DbId,
    pub user_id: String,
    pub entity_id: String,
    pub entity_document_id: String,
    pub connection_id: Option<String>,
    pub created_at: Timestamp,
}

impl From<OpenEntity> for LockRecord {
    fn from(row: OpenEntity) -> Self {
        LockRecord {
            user_id: UserId::from(row.user_id),
            entity_id: row.entity_id,
            entity_document_id: row.entity_document_id,
            connection_id: row.connection_id,
            created_at: row.created_at,
        }
    }
}
