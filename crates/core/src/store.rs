//! Storage seam for lock records.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::locking::{LockFilter, LockRecord};

/// Backing store for lock records.
///
/// Only [`LockRegistry`](crate::registry::LockRegistry) writes through this
/// trait. Implementations must make each call atomic on its own; the
/// registry provides per-triple ordering on top.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Insert `record`, or overwrite the connection id and timestamp of the
    /// existing record for the same triple, in one step. A failed call leaves
    /// any existing record untouched.
    async fn upsert(&self, record: LockRecord) -> Result<LockRecord, BoxError>;

    /// The oldest record matching `filter`.
    async fn find_one(&self, filter: &LockFilter) -> Result<Option<LockRecord>, BoxError>;

    /// All matching records, oldest first.
    async fn find_many(&self, filter: &LockFilter) -> Result<Vec<LockRecord>, BoxError>;

    /// Delete all matching records, returning how many were removed.
    async fn delete_many(&self, filter: &LockFilter) -> Result<u64, BoxError>;

    async fn count(&self, filter: &LockFilter) -> Result<u64, BoxError>;
}
