use crate::application::ports::action_store::ActionStore;
use crate::application::ports::attachments::{AttachmentStore, DraftFolder};
use crate::application::ports::glossary_remote::GlossaryRemote;
use crate::domain::entities::offline::PendingEntry;
use crate::shared::best_effort::best_effort;
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Queues glossary entries locally for a later sync pass.
///
/// Glossary concepts are unique per glossary, so queueing checks the new
/// concept against both the local queue and whatever entry list is already
/// cached. The cache check never touches the network; a concept that only
/// exists server-side and was never fetched will be caught at sync time
/// instead.
pub struct GlossaryOfflineService {
    store: Arc<dyn ActionStore>,
    remote: Arc<dyn GlossaryRemote>,
    attachments: Arc<dyn AttachmentStore>,
}

impl Clone for GlossaryOfflineService {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            remote: Arc::clone(&self.remote),
            attachments: Arc::clone(&self.attachments),
        }
    }
}

impl GlossaryOfflineService {
    pub fn new(
        store: Arc<dyn ActionStore>,
        remote: Arc<dyn GlossaryRemote>,
        attachments: Arc<dyn AttachmentStore>,
    ) -> Self {
        Self {
            store,
            remote,
            attachments,
        }
    }

    /// Save a new entry draft. A zero `time_created` is stamped with the
    /// current time; a non-zero one replaces the existing draft with that
    /// identity.
    pub async fn queue_new_entry(&self, mut entry: PendingEntry) -> Result<PendingEntry, AppError> {
        let editing = entry.time_created != 0;
        if !editing {
            entry.time_created = Utc::now().timestamp_millis();
        }

        if self
            .is_concept_taken(&entry, editing.then_some(entry.time_created))
            .await?
        {
            return Err(AppError::ValidationError(format!(
                "An entry with the concept '{}' already exists in this glossary",
                entry.concept
            )));
        }

        if editing {
            self.store
                .delete_entry(entry.glossary_id, entry.user_id, entry.time_created)
                .await?;
        }

        debug!(
            "Queueing entry '{}' for glossary {}",
            entry.concept, entry.glossary_id
        );
        self.store.add_entry(entry.clone()).await?;
        Ok(entry)
    }

    /// Drop an entry draft and its staged attachments.
    pub async fn discard_new_entry(
        &self,
        glossary_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError> {
        self.store
            .delete_entry(glossary_id, user_id, time_created)
            .await?;
        best_effort(self.attachments.delete_folder(&DraftFolder::NewEntry {
            glossary_id,
            time_created,
        }))
        .await;
        Ok(())
    }

    /// Case-insensitive concept collision check against other local drafts
    /// and the cached remote listing. `exclude_time_created` skips the
    /// draft currently being edited.
    async fn is_concept_taken(
        &self,
        entry: &PendingEntry,
        exclude_time_created: Option<i64>,
    ) -> Result<bool, AppError> {
        let concept = entry.concept.to_lowercase();

        let local = self
            .store
            .entries_for_glossary(entry.glossary_id, None)
            .await?;
        if local.iter().any(|e| {
            e.concept.to_lowercase() == concept
                && exclude_time_created != Some(e.time_created)
        }) {
            return Ok(true);
        }

        let cached = best_effort(self.remote.cached_entries(entry.glossary_id)).await;

        Ok(cached
            .map(|entries| entries.iter().any(|e| e.concept.to_lowercase() == concept))
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{
        MemoryActionStore, MockAttachmentStore, MockGlossaryRemote,
    };
    use crate::domain::entities::glossary::{EntriesPage, GlossaryEntry};
    use crate::domain::value_objects::ActionOptions;

    fn service() -> (
        GlossaryOfflineService,
        Arc<MemoryActionStore>,
        Arc<MockGlossaryRemote>,
    ) {
        let store = Arc::new(MemoryActionStore::default());
        let remote = Arc::new(MockGlossaryRemote::default());
        let attachments = Arc::new(MockAttachmentStore::default());
        (
            GlossaryOfflineService::new(store.clone(), remote.clone(), attachments),
            store,
            remote,
        )
    }

    fn entry(concept: &str) -> PendingEntry {
        PendingEntry {
            glossary_id: 9,
            course_id: 3,
            concept: concept.into(),
            definition: "A definition".into(),
            options: ActionOptions::empty(),
            user_id: 2,
            time_created: 0,
        }
    }

    #[tokio::test]
    async fn test_queue_stamps_creation_time() {
        let (service, store, _) = service();

        let queued = service.queue_new_entry(entry("Osmosis")).await.unwrap();

        assert!(queued.time_created > 0);
        assert_eq!(store.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_concept_in_local_queue_rejected() {
        let (service, _, _) = service();

        service.queue_new_entry(entry("Osmosis")).await.unwrap();
        let err = service.queue_new_entry(entry("osmosis")).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_duplicate_concept_in_cached_listing_rejected() {
        let (service, _, remote) = service();
        *remote.page.lock().unwrap() = Ok(EntriesPage {
            entries: vec![GlossaryEntry {
                id: 50,
                glossary_id: 9,
                concept: "Diffusion".into(),
                definition: "Spreading out".into(),
                user_id: 5,
                user_full_name: None,
                time_created: 10,
            }],
            total: 1,
        });

        let err = service.queue_new_entry(entry("diffusion")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_duplicate_concept_cached_under_paged_key_rejected() {
        use crate::application::ports::cache::CacheStrategy;
        use crate::application::ports::transport::WsError;
        use crate::domain::entities::glossary::{DateOrder, EntryFetchMode};
        use crate::infrastructure::cache::MemoryCache;
        use crate::infrastructure::remote::testing::ScriptedTransport;
        use crate::infrastructure::remote::GlossaryWsClient;
        use serde_json::json;

        let payload = json!({
            "entries": [{
                "id": 50,
                "glossaryid": 9,
                "concept": "Diffusion",
                "definition": "Spreading out",
                "userid": 5,
                "timecreated": 10
            }],
            "count": 1
        });
        let transport = Arc::new(ScriptedTransport::ok(payload));
        let remote = Arc::new(GlossaryWsClient::new(
            transport.clone(),
            Arc::new(MemoryCache::new(60)),
        ));

        // A browsing screen populates the cache with its own paging, then
        // the device goes offline.
        remote
            .entries(
                9,
                &EntryFetchMode::ByDate {
                    order: DateOrder::CreatedDesc,
                },
                0,
                20,
                CacheStrategy::PreferCache,
            )
            .await
            .unwrap();
        *transport.response.lock().unwrap() = Err(WsError::Connectivity("offline".into()));

        let store = Arc::new(MemoryActionStore::default());
        let service = GlossaryOfflineService::new(
            store,
            remote,
            Arc::new(MockAttachmentStore::default()),
        );

        let err = service.queue_new_entry(entry("diffusion")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_cache_miss_does_not_block_queueing() {
        let (service, store, remote) = service();
        *remote.page.lock().unwrap() = Err(AppError::NotFound("not cached".into()));

        service.queue_new_entry(entry("Osmosis")).await.unwrap();
        assert_eq!(store.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_editing_draft_keeps_own_concept() {
        let (service, store, _) = service();

        let queued = service.queue_new_entry(entry("Osmosis")).await.unwrap();

        let mut edited = queued.clone();
        edited.definition = "A better definition".into();
        service.queue_new_entry(edited).await.unwrap();

        let entries = store.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].definition, "A better definition");
    }

    #[tokio::test]
    async fn test_discard_removes_record() {
        let (service, store, _) = service();

        let queued = service.queue_new_entry(entry("Osmosis")).await.unwrap();
        service
            .discard_new_entry(9, 2, queued.time_created)
            .await
            .unwrap();

        assert!(store.entries.lock().unwrap().is_empty());
    }
}
