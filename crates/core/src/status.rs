//! Read-side queries: "is this document being edited by someone else?"

use std::sync::Arc;

use serde::Serialize;

use crate::directory::UserDirectory;
use crate::error::{Collaborator, CoreError};
use crate::locking::{LockFilter, LockRecord};
use crate::registry::LockRegistry;
use crate::types::UserId;

/// The other user currently holding a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolderInfo {
    #[serde(skip)]
    pub user_id: UserId,
    #[serde(rename = "editedBy")]
    pub edited_by: String,
}

pub struct StatusQueryService {
    registry: Arc<LockRegistry>,
    directory: Arc<dyn UserDirectory>,
}

impl StatusQueryService {
    pub fn new(registry: Arc<LockRegistry>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// Holder of any lock on the document other than `requesting_user`.
    pub async fn status_by_document(
        &self,
        entity_document_id: &str,
        requesting_user: &UserId,
    ) -> Result<Option<HolderInfo>, CoreError> {
        let filter = LockFilter::all()
            .document(entity_document_id)
            .not_user(requesting_user);
        self.resolve(filter).await
    }

    /// Like [`status_by_document`](Self::status_by_document) but restricted to
    /// one entity type, for documents whose ids may collide across types.
    pub async fn status_by_entity_and_document(
        &self,
        entity_id: &str,
        entity_document_id: &str,
        requesting_user: &UserId,
    ) -> Result<Option<HolderInfo>, CoreError> {
        let filter = LockFilter::all()
            .entity(entity_id)
            .document(entity_document_id)
            .not_user(requesting_user);
        self.resolve(filter).await
    }

    async fn resolve(&self, filter: LockFilter) -> Result<Option<HolderInfo>, CoreError> {
        let Some(LockRecord { user_id, .. }) = self.registry.find_holder(&filter).await? else {
            return Ok(None);
        };

        let user = self
            .directory
            .find_user(&user_id)
            .await
            .map_err(CoreError::collaborator(Collaborator::UserDirectory))?
            .ok_or_else(|| CoreError::UserNotFound(user_id.clone()))?;

        Ok(Some(HolderInfo {
            edited_by: user.display_name(),
            user_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::locking::LockTarget;
    use crate::memory::{MemoryLockStore, StaticDirectory, StaticPermissions};

    const ARTICLE: &str = "api::article.article";
    const PAGE: &str = "api::page.page";

    struct Fixture {
        registry: Arc<LockRegistry>,
        status: StatusQueryService,
    }

    fn fixture() -> Fixture {
        let perms = StaticPermissions::new()
            .grant("1", "plugin::content-manager.explorer.publish", ARTICLE)
            .grant("1", "plugin::content-manager.explorer.publish", PAGE)
            .grant("2", "plugin::content-manager.explorer.create", ARTICLE)
            .grant("99", "plugin::content-manager.explorer.create", ARTICLE);
        let directory = StaticDirectory::new()
            .with_user("1", "Ada", "Lovelace")
            .with_user("2", "Grace", "Hopper");

        let registry = Arc::new(LockRegistry::new(
            Arc::new(MemoryLockStore::new()),
            Arc::new(perms),
        ));
        let status = StatusQueryService::new(Arc::clone(&registry), Arc::new(directory));
        Fixture { registry, status }
    }

    fn target(entity: &str, doc: &str) -> LockTarget {
        LockTarget::new(entity, doc).unwrap()
    }

    #[tokio::test]
    async fn other_user_sees_holder_by_both_queries() {
        let f = fixture();
        let ada = UserId::from("1");
        let grace = UserId::from("2");
        f.registry.acquire(&ada, &target(ARTICLE, "d1"), Some("c1")).await.unwrap();

        let by_doc = f.status.status_by_document("d1", &grace).await.unwrap();
        let by_both = f
            .status
            .status_by_entity_and_document(ARTICLE, "d1", &grace)
            .await
            .unwrap();

        assert_eq!(by_doc.as_ref().map(|h| h.edited_by.as_str()), Some("Ada Lovelace"));
        assert_eq!(by_doc, by_both);
    }

    #[tokio::test]
    async fn holder_does_not_see_own_lock() {
        let f = fixture();
        let ada = UserId::from("1");
        f.registry.acquire(&ada, &target(ARTICLE, "d1"), None).await.unwrap();

        assert!(f.status.status_by_document("d1", &ada).await.unwrap().is_none());
        assert!(f
            .status
            .status_by_entity_and_document(ARTICLE, "d1", &ada)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn entity_filter_disambiguates_colliding_documents() {
        let f = fixture();
        let ada = UserId::from("1");
        let grace = UserId::from("2");
        f.registry.acquire(&ada, &target(PAGE, "shared"), None).await.unwrap();

        assert!(f.status.status_by_document("shared", &grace).await.unwrap().is_some());
        assert!(f
            .status
            .status_by_entity_and_document(ARTICLE, "shared", &grace)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn release_clears_status() {
        let f = fixture();
        let ada = UserId::from("1");
        let grace = UserId::from("2");
        let t = target(ARTICLE, "d1");
        f.registry.acquire(&ada, &t, None).await.unwrap();
        f.registry.release(&ada, &t).await.unwrap();

        assert!(f.status.status_by_document("d1", &grace).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disconnect_clears_status() {
        let f = fixture();
        let ada = UserId::from("1");
        let grace = UserId::from("2");
        f.registry.acquire(&ada, &target(ARTICLE, "d1"), Some("c1")).await.unwrap();
        assert!(f
            .status
            .status_by_entity_and_document(ARTICLE, "d1", &grace)
            .await
            .unwrap()
            .is_some());

        f.registry.release_by_connection("c1").await.unwrap();
        assert!(f
            .status
            .status_by_entity_and_document(ARTICLE, "d1", &grace)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn restart_clears_rest_acquired_lock() {
        let f = fixture();
        let ada = UserId::from("1");
        let grace = UserId::from("2");
        f.registry.acquire(&ada, &target(ARTICLE, "d1"), None).await.unwrap();

        f.registry.init().await.unwrap();
        assert!(f.status.status_by_document("d1", &grace).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unresolvable_holder_is_an_error() {
        let f = fixture();
        let ghost = UserId::from("99");
        f.registry.acquire(&ghost, &target(ARTICLE, "d1"), None).await.unwrap();

        let result = f.status.status_by_document("d1", &UserId::from("2")).await;
        assert_matches!(result, Err(CoreError::UserNotFound(id)) if id == ghost);
    }

    #[test]
    fn holder_serializes_as_edited_by_only() {
        let holder = HolderInfo {
            user_id: UserId::from("1"),
            edited_by: "Ada Lovelace".into(),
        };
        assert_eq!(
            serde_json::to_value(&holder).unwrap(),
            serde_json::json!({ "editedBy": "Ada Lovelace" })
        );
    }
}
