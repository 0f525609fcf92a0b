//! Lock records, their identifying keys, and the filters used to query them.
//!
//! A lock ("open-entity record") marks that a user is editing one document of
//! one content type. Records are identified by the `(user, entity, document)`
//! triple; the optional connection id ties a record to the real-time session
//! that created it so it can be dropped when that session ends.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{Timestamp, UserId};

// ---------------------------------------------------------------------------
// LockTarget
// ---------------------------------------------------------------------------

/// The document a lock applies to: a content type plus a document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct LockTarget {
    #[serde(rename = "entityId")]
    #[validate(length(min = 1, max = 255))]
    pub entity_id: String,
    #[serde(rename = "entityDocumentId")]
    #[validate(length(min = 1, max = 255))]
    pub entity_document_id: String,
}

impl LockTarget {
    /// Build a target, rejecting empty or oversized identifiers.
    pub fn new(
        entity_id: impl Into<String>,
        entity_document_id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let target = Self {
            entity_id: entity_id.into(),
            entity_document_id: entity_document_id.into(),
        };
        target.check()?;
        Ok(target)
    }

    /// Run field validation on an already-constructed target (e.g. one
    /// deserialized from a socket frame).
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

/// A document id on its own, as taken by the document-only status query.
#[derive(Validate)]
struct DocumentRef<'a> {
    #[validate(length(min = 1, max = 255))]
    entity_document_id: &'a str,
}

/// Validate a bare document id with the same rule [`LockTarget`] applies.
pub fn validate_document_id(entity_document_id: &str) -> Result<(), CoreError> {
    DocumentRef { entity_document_id }
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

// ---------------------------------------------------------------------------
// LockKey / LockRecord
// ---------------------------------------------------------------------------

/// The triple that uniquely identifies a lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey {
    pub user_id: UserId,
    pub entity_id: String,
    pub entity_document_id: String,
}

impl LockKey {
    pub fn new(user_id: &UserId, target: &LockTarget) -> Self {
        Self {
            user_id: user_id.clone(),
            entity_id: target.entity_id.clone(),
            entity_document_id: target.entity_document_id.clone(),
        }
    }
}

/// One held lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockRecord {
    pub user_id: UserId,
    pub entity_id: String,
    pub entity_document_id: String,
    /// `None` for locks taken over REST, which have no live session.
    pub connection_id: Option<String>,
    pub created_at: Timestamp,
}

impl LockRecord {
    pub fn new(user_id: &UserId, target: &LockTarget, connection_id: Option<&str>) -> Self {
        Self {
            user_id: user_id.clone(),
            entity_id: target.entity_id.clone(),
            entity_document_id: target.entity_document_id.clone(),
            connection_id: connection_id.map(str::to_string),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn key(&self) -> LockKey {
        LockKey {
            user_id: self.user_id.clone(),
            entity_id: self.entity_id.clone(),
            entity_document_id: self.entity_document_id.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// LockFilter
// ---------------------------------------------------------------------------

/// A conjunction of field predicates over lock records.
///
/// Unset fields match anything, so `LockFilter::all()` matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFilter {
    pub user_id: Option<UserId>,
    pub exclude_user_id: Option<UserId>,
    pub entity_id: Option<String>,
    pub entity_document_id: Option<String>,
    pub connection_id: Option<String>,
}

impl LockFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Match exactly the records for one triple.
    pub fn for_key(key: &LockKey) -> Self {
        Self::all()
            .user(&key.user_id)
            .entity(&key.entity_id)
            .document(&key.entity_document_id)
    }

    pub fn user(mut self, user_id: &UserId) -> Self {
        self.user_id = Some(user_id.clone());
        self
    }

    pub fn not_user(mut self, user_id: &UserId) -> Self {
        self.exclude_user_id = Some(user_id.clone());
        self
    }

    pub fn entity(mut self, entity_id: &str) -> Self {
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn document(mut self, entity_document_id: &str) -> Self {
        self.entity_document_id = Some(entity_document_id.to_string());
        self
    }

    pub fn connection(mut self, connection_id: &str) -> Self {
        self.connection_id = Some(connection_id.to_string());
        self
    }

    /// Returns `true` if the record satisfies every set predicate.
    pub fn matches(&self, record: &LockRecord) -> bool {
        fn eq<T: PartialEq + ?Sized>(want: Option<&T>, have: &T) -> bool {
            want.map_or(true, |w| w == have)
        }

        eq(self.user_id.as_ref(), &record.user_id)
            && self
                .exclude_user_id
                .as_ref()
                .map_or(true, |u| u != &record.user_id)
            && eq(self.entity_id.as_deref(), record.entity_id.as_str())
            && eq(
                self.entity_document_id.as_deref(),
                record.entity_document_id.as_str(),
            )
            && self
                .connection_id
                .as_deref()
                .map_or(true, |c| record.connection_id.as_deref() == Some(c))
    }
}
