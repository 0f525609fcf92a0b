//! The rule deciding who may take an edit lock.
//!
//! Only users who could already materially alter a record (create, delete or
//! publish it) may lock it. Action names are matched by substring, so a
//! host action such as `plugin::content-manager.explorer.publish` qualifies.

use serde::{Deserialize, Serialize};

/// Action fragments that grant the right to lock.
pub const LOCKING_ACTIONS: &[&str] = &["create", "delete", "publish"];

/// One `{action, subject}` grant from the host's permission tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub action: String,
    pub subject: String,
}

impl Permission {
    pub fn new(action: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            subject: subject.into(),
        }
    }

    fn allows_locking(&self, entity_id: &str) -> bool {
        self.subject == entity_id
            && LOCKING_ACTIONS
                .iter()
                .any(|operation| self.action.contains(operation))
    }
}

/// Returns `true` if any grant lets the user lock documents of `entity_id`.
pub fn can_lock(grants: &[Permission], entity_id: &str) -> bool {
    grants.iter().any(|grant| grant.allows_locking(entity_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_grant_on_same_subject_allows() {
        let grants = vec![Permission::new("content-manager.explorer.publish", "article")];
        assert!(can_lock(&grants, "article"));
    }

    #[test]
    fn read_only_grant_denies() {
        let grants = vec![Permission::new("read", "article")];
        assert!(!can_lock(&grants, "article"));
    }

    #[test]
    fn no_grants_denies() {
        assert!(!can_lock(&[], "article"));
    }

    #[test]
    fn grant_on_other_subject_denies() {
        let grants = vec![Permission::new("plugin::content-manager.explorer.create", "page")];
        assert!(!can_lock(&grants, "article"));
    }

    #[test]
    fn action_is_matched_by_substring() {
        for action in [
            "plugin::content-manager.explorer.create",
            "plugin::content-manager.explorer.delete",
            "publish",
            "bulk-delete-everything",
        ] {
            let grants = vec![Permission::new(action, "api::article.article")];
            assert!(
                can_lock(&grants, "api::article.article"),
                "{action} should allow locking"
            );
        }
    }

    #[test]
    fn substring_match_is_case_sensitive() {
        let grants = vec![Permission::new("PUBLISH", "article")];
        assert!(!can_lock(&grants, "article"));
    }

    #[test]
    fn one_qualifying_grant_among_many_is_enough() {
        let grants = vec![
            Permission::new("plugin::content-manager.explorer.read", "article"),
            Permission::new("plugin::content-manager.explorer.update", "article"),
            Permission::new("plugin::content-manager.explorer.delete", "article"),
        ];
        assert!(can_lock(&grants, "article"));
    }
}
