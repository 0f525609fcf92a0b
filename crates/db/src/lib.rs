//! Postgres persistence for the record-locking service.
//!
//! - [`repositories`] -- query helpers for the `open_entities` table and the
//!   host's admin permission / user tables.
//! - [`collaborators`] -- adapters implementing the core collaborator traits
//!   on top of those repositories.

use sqlx::postgres::PgPoolOptions;

pub mod collaborators;
pub mod models;
pub mod repositories;

pub use collaborators::{PgLockStore, PgPermissionSource, PgUserDirectory};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply the `open_entities` migrations. The host's admin tables are not
/// managed here.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
