use std::fmt;

use crate::types::UserId;

/// Boxed error returned by collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The external services the locking core depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    LockStore,
    PermissionService,
    UserDirectory,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::LockStore => "lock store",
            Collaborator::PermissionService => "permission service",
            Collaborator::UserDirectory => "user directory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Permission denied: user {user_id} may not lock entity {entity_id}")]
    PermissionDenied { user_id: UserId, entity_id: String },

    #[error("Lock holder {0} could not be resolved")]
    UserNotFound(UserId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{collaborator} failed: {source}")]
    Collaborator {
        collaborator: Collaborator,
        #[source]
        source: BoxError,
    },
}

impl CoreError {
    /// Wrap a collaborator failure, tagging which service produced it.
    pub fn collaborator(collaborator: Collaborator) -> impl FnOnce(BoxError) -> Self {
        move |source| CoreError::Collaborator {
            collaborator,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_error_names_the_service() {
        let source: BoxError = "connection refused".into();
        let err = CoreError::collaborator(Collaborator::UserDirectory)(source);
        assert_eq!(
            err.to_string(),
            "user directory failed: connection refused"
        );
    }

    #[test]
    fn permission_denied_message_includes_user_and_entity() {
        let err = CoreError::PermissionDenied {
            user_id: UserId::from("7"),
            entity_id: "api::article.article".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("user 7"));
        assert!(msg.contains("api::article.article"));
    }
}
