//! services/api/src/services/drafts.rs
//!
//! The draft store: per-user CRUD over the key-value port. Every mutation
//! rewrites the user's entire collection so the durable copy always matches
//! what the caller last observed. Mutating operations are serialized through
//! an async mutex so rapid repeated calls cannot lose updates.

use chrono::Utc;
use draftdesk_core::domain::{normalize_hashtag, Draft, DraftPatch};
use draftdesk_core::ports::{KeyValueStore, PortError, PortResult};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

const UNTITLED: &str = "Untitled Draft";

/// Owns all draft collections. Operations take an explicit `user_id`; the
/// caller (the web layer) resolves the current session before calling in.
pub struct DraftService {
    store: Arc<dyn KeyValueStore>,
    // Guards every read-modify-write cycle against interleaving.
    write_lock: Mutex<()>,
}

impl DraftService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the user's drafts, newest first.
    pub async fn list(&self, user_id: &str) -> PortResult<Vec<Draft>> {
        let _guard = self.write_lock.lock().await;
        self.load(user_id).await
    }

    /// Looks a draft up by id. An absent draft is `None`, not an error.
    pub async fn get(&self, user_id: &str, draft_id: &str) -> PortResult<Option<Draft>> {
        let _guard = self.write_lock.lock().await;
        let drafts = self.load(user_id).await?;
        Ok(drafts.into_iter().find(|d| d.id == draft_id))
    }

    /// Creates a draft from partial fields, prepends it to the collection and
    /// persists. Omitted fields take defaults; hashtags are normalized.
    pub async fn save(&self, user_id: &str, patch: DraftPatch) -> PortResult<Draft> {
        let _guard = self.write_lock.lock().await;
        let mut drafts = self.load(user_id).await?;

        let now = Utc::now();
        let draft = Draft {
            id: format!("draft-{}", Uuid::new_v4().simple()),
            title: patch.title.unwrap_or_else(|| UNTITLED.to_string()),
            caption: patch.caption.unwrap_or_default(),
            hashtags: patch
                .hashtags
                .unwrap_or_default()
                .iter()
                .map(|t| normalize_hashtag(t))
                .collect(),
            image_url: patch.image_url,
            created_at: now,
            updated_at: now,
            ai_prompt: patch.ai_prompt,
        };

        drafts.insert(0, draft.clone());
        self.persist(user_id, &drafts).await?;
        debug!(user_id, draft_id = %draft.id, "draft saved");
        Ok(draft)
    }

    /// Merges the patch over an existing draft and refreshes `updated_at`.
    /// Fails with `NotFound` when the id is absent, leaving the collection
    /// untouched.
    pub async fn update(
        &self,
        user_id: &str,
        draft_id: &str,
        patch: DraftPatch,
    ) -> PortResult<Draft> {
        let _guard = self.write_lock.lock().await;
        let mut drafts = self.load(user_id).await?;

        let draft = drafts
            .iter_mut()
            .find(|d| d.id == draft_id)
            .ok_or_else(|| PortError::NotFound(format!("draft '{}'", draft_id)))?;

        if let Some(title) = patch.title {
            draft.title = title;
        }
        if let Some(caption) = patch.caption {
            draft.caption = caption;
        }
        if let Some(hashtags) = patch.hashtags {
            draft.hashtags = hashtags.iter().map(|t| normalize_hashtag(t)).collect();
        }
        if let Some(image_url) = patch.image_url {
            draft.image_url = Some(image_url);
        }
        if let Some(ai_prompt) = patch.ai_prompt {
            draft.ai_prompt = Some(ai_prompt);
        }
        draft.updated_at = Utc::now();

        let updated = draft.clone();
        self.persist(user_id, &drafts).await?;
        debug!(user_id, draft_id, "draft updated");
        Ok(updated)
    }

    /// Removes the matching draft if present; absent ids are a no-op.
    pub async fn delete(&self, user_id: &str, draft_id: &str) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut drafts = self.load(user_id).await?;
        drafts.retain(|d| d.id != draft_id);
        self.persist(user_id, &drafts).await?;
        debug!(user_id, draft_id, "draft deleted");
        Ok(())
    }

    /// Loads the user's collection. A never-written key initializes (and
    /// persists) an empty collection.
    async fn load(&self, user_id: &str) -> PortResult<Vec<Draft>> {
        match self.store.get(&drafts_key(user_id)).await? {
            Some(text) => {
                serde_json::from_str(&text).map_err(|e| PortError::Storage(e.to_string()))
            }
            None => {
                let empty: Vec<Draft> = Vec::new();
                self.persist(user_id, &empty).await?;
                Ok(empty)
            }
        }
    }

    async fn persist(&self, user_id: &str, drafts: &[Draft]) -> PortResult<()> {
        let text =
            serde_json::to_string(drafts).map_err(|e| PortError::Storage(e.to_string()))?;
        self.store.set(&drafts_key(user_id), &text).await
    }
}

fn drafts_key(user_id: &str) -> String {
    format!("drafts_{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use draftdesk_core::domain::AiPrompt;

    fn service() -> (DraftService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (DraftService::new(store.clone()), store)
    }

    fn patch(title: &str) -> DraftPatch {
        DraftPatch {
            title: Some(title.to_string()),
            caption: Some("A caption".to_string()),
            hashtags: Some(vec!["#One".to_string(), "two words".to_string()]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_then_get_returns_the_saved_draft() {
        let (drafts, _) = service();
        let saved = drafts.save("user-1", patch("Launch post")).await.unwrap();

        assert!(saved.id.starts_with("draft-"));
        assert_eq!(saved.created_at, saved.updated_at);

        let fetched = drafts.get("user-1", &saved.id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn save_applies_defaults_for_omitted_fields() {
        let (drafts, _) = service();
        let saved = drafts.save("user-1", DraftPatch::default()).await.unwrap();

        assert_eq!(saved.title, "Untitled Draft");
        assert_eq!(saved.caption, "");
        assert!(saved.hashtags.is_empty());
        assert!(saved.image_url.is_none());
        assert!(saved.ai_prompt.is_none());
    }

    #[tokio::test]
    async fn save_normalizes_hashtags() {
        let (drafts, _) = service();
        let saved = drafts.save("user-1", patch("x")).await.unwrap();
        assert_eq!(saved.hashtags, vec!["#One", "#twowords"]);
    }

    #[tokio::test]
    async fn collection_is_newest_first() {
        let (drafts, _) = service();
        drafts.save("user-1", patch("first")).await.unwrap();
        drafts.save("user-1", patch("second")).await.unwrap();

        let listed = drafts.list("user-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "second");
        assert_eq!(listed[1].title, "first");
    }

    #[tokio::test]
    async fn update_merges_fields_and_refreshes_updated_at() {
        let (drafts, _) = service();
        let saved = drafts.save("user-1", patch("before")).await.unwrap();

        let updated = drafts
            .update(
                "user-1",
                &saved.id,
                DraftPatch {
                    title: Some("after".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.caption, saved.caption);
        assert_eq!(updated.hashtags, saved.hashtags);
        assert_eq!(updated.created_at, saved.created_at);
        assert!(updated.updated_at >= saved.updated_at);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found_and_changes_nothing() {
        let (drafts, _) = service();
        drafts.save("user-1", patch("keep me")).await.unwrap();

        let result = drafts
            .update("user-1", "draft-missing", DraftPatch::default())
            .await;
        assert!(matches!(result, Err(PortError::NotFound(_))));

        let listed = drafts.list("user-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "keep me");
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_and_tolerates_absence() {
        let (drafts, _) = service();
        let a = drafts.save("user-1", patch("a")).await.unwrap();
        drafts.save("user-1", patch("b")).await.unwrap();

        drafts.delete("user-1", &a.id).await.unwrap();
        assert_eq!(drafts.list("user-1").await.unwrap().len(), 1);

        // Deleting again is a no-op, not an error.
        drafts.delete("user-1", &a.id).await.unwrap();
        assert_eq!(drafts.list("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn collections_round_trip_through_the_store() {
        let (drafts, store) = service();
        let saved = drafts
            .save(
                "user-1",
                DraftPatch {
                    title: Some("persisted".to_string()),
                    ai_prompt: Some(AiPrompt {
                        industry: "Technology".to_string(),
                        tone: "Professional".to_string(),
                        audience: "Developers".to_string(),
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // A fresh service over the same store simulates session reattachment.
        let reloaded = DraftService::new(store);
        let listed = reloaded.list("user-1").await.unwrap();
        assert_eq!(listed, vec![saved]);
    }

    #[tokio::test]
    async fn first_load_persists_an_empty_collection() {
        let (drafts, store) = service();
        assert!(drafts.list("user-9").await.unwrap().is_empty());
        assert_eq!(
            store.get("drafts_user-9").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn collections_are_scoped_per_user() {
        let (drafts, _) = service();
        drafts.save("user-1", patch("mine")).await.unwrap();
        assert!(drafts.list("user-2").await.unwrap().is_empty());
    }
}
