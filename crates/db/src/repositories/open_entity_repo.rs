//! Repository for the `open_entities` table.

use record_locking_core::locking::{LockFilter, LockRecord};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::open_entity::OpenEntity;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, entity_id, entity_document_id, connection_id, created_at";

/// Provides create / find / delete operations for lock rows.
pub struct OpenEntityRepo;

impl OpenEntityRepo {
    /// Insert a lock row, or refresh the connection id and timestamp of the
    /// row already held for the same triple.
    pub async fn upsert(pool: &PgPool, record: &LockRecord) -> Result<OpenEntity, sqlx::Error> {
        let query = format!(
            "INSERT INTO open_entities (user_id, entity_id, entity_document_id, connection_id, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_open_entities_triple \
             DO UPDATE SET connection_id = EXCLUDED.connection_id, created_at = EXCLUDED.created_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OpenEntity>(&query)
            .bind(record.user_id.as_str())
            .bind(&record.entity_id)
            .bind(&record.entity_document_id)
            .bind(record.connection_id.as_deref())
            .bind(record.created_at)
            .fetch_one(pool)
            .await
    }

    /// Oldest row matching the filter.
    pub async fn find_one(
        pool: &PgPool,
        filter: &LockFilter,
    ) -> Result<Option<OpenEntity>, sqlx::Error> {
        let mut query = filtered(&format!("SELECT {COLUMNS} FROM open_entities"), filter);
        query.push(" ORDER BY id ASC LIMIT 1");
        query.build_query_as::<OpenEntity>().fetch_optional(pool).await
    }

    /// All rows matching the filter, oldest first.
    pub async fn find_many(
        pool: &PgPool,
        filter: &LockFilter,
    ) -> Result<Vec<OpenEntity>, sqlx::Error> {
        let mut query = filtered(&format!("SELECT {COLUMNS} FROM open_entities"), filter);
        query.push(" ORDER BY id ASC");
        query.build_query_as::<OpenEntity>().fetch_all(pool).await
    }

    /// Delete every row matching the filter. Returns the number removed.
    pub async fn delete_many(pool: &PgPool, filter: &LockFilter) -> Result<u64, sqlx::Error> {
        let mut query = filtered("DELETE FROM open_entities", filter);
        let result = query.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Count rows matching the filter.
    pub async fn count(pool: &PgPool, filter: &LockFilter) -> Result<i64, sqlx::Error> {
        let mut query = filtered("SELECT COUNT(*) FROM open_entities", filter);
        query.build_query_scalar::<i64>().fetch_one(pool).await
    }
}

/// Append a `WHERE` clause for every predicate set on `filter`.
fn filtered(prefix: &str, filter: &LockFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(prefix);
    query.push(" WHERE TRUE");

    if let Some(user_id) = &filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id.as_str().to_owned());
    }
    if let Some(user_id) = &filter.exclude_user_id {
        query.push(" AND user_id <> ").push_bind(user_id.as_str().to_owned());
    }
    if let Some(entity_id) = &filter.entity_id {
        query.push(" AND entity_id = ").push_bind(entity_id.clone());
    }
    if let Some(document_id) = &filter.entity_document_id {
        query
            .push(" AND entity_document_id = ")
            .push_bind(document_id.clone());
    }
    if let Some(connection_id) = &filter.connection_id {
        query.push(" AND connection_id = ").push_bind(connection_id.clone());
    }
    query
}
