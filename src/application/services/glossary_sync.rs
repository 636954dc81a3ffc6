use crate::application::ports::action_store::ActionStore;
use crate::application::ports::activity_log::ActivityLogQueue;
use crate::application::ports::attachments::{AttachmentStore, DraftFolder, FileUploader};
use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::glossary_remote::GlossaryRemote;
use crate::application::ports::rating_sync::RatingSync;
use crate::application::services::forum_sync::collect_outcomes;
use crate::application::services::helpers::{offline_data_deleted_warning, upload_attachments};
use crate::application::services::sync_registry::SyncRegistry;
use crate::domain::constants::{CONTEXT_LEVEL_MODULE, GLOSSARY_COMPONENT, RATING_AREA_ENTRY};
use crate::domain::entities::offline::{PendingEntry, SyncResult};
use crate::domain::value_objects::SyncId;
use crate::shared::best_effort::{best_effort, best_effort_or};
use crate::shared::error::AppError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Submits the pending glossary entries of one user to the server.
pub struct GlossarySyncService {
    registry: Arc<SyncRegistry>,
    store: Arc<dyn ActionStore>,
    remote: Arc<dyn GlossaryRemote>,
    connectivity: Arc<dyn ConnectivityProbe>,
    attachments: Arc<dyn AttachmentStore>,
    uploader: Arc<dyn FileUploader>,
    ratings: Arc<dyn RatingSync>,
    logs: Arc<dyn ActivityLogQueue>,
}

impl Clone for GlossarySyncService {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
            remote: Arc::clone(&self.remote),
            connectivity: Arc::clone(&self.connectivity),
            attachments: Arc::clone(&self.attachments),
            uploader: Arc::clone(&self.uploader),
            ratings: Arc::clone(&self.ratings),
            logs: Arc::clone(&self.logs),
        }
    }
}

impl GlossarySyncService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<SyncRegistry>,
        store: Arc<dyn ActionStore>,
        remote: Arc<dyn GlossaryRemote>,
        connectivity: Arc<dyn ConnectivityProbe>,
        attachments: Arc<dyn AttachmentStore>,
        uploader: Arc<dyn FileUploader>,
        ratings: Arc<dyn RatingSync>,
        logs: Arc<dyn ActivityLogQueue>,
    ) -> Self {
        Self {
            registry,
            store,
            remote,
            connectivity,
            attachments,
            uploader,
            ratings,
            logs,
        }
    }

    pub fn registry(&self) -> &Arc<SyncRegistry> {
        &self.registry
    }

    /// Sync the pending entries of `user_id` against `glossary_id`.
    pub async fn sync_entries(
        &self,
        glossary_id: i64,
        user_id: i64,
    ) -> Result<SyncResult, AppError> {
        let sync_id = SyncId::glossary(glossary_id, user_id);
        let service = self.clone();
        self.registry
            .run(sync_id, async move {
                service.entries_pass(glossary_id, user_id).await
            })
            .await
    }

    pub async fn sync_entries_if_needed(
        &self,
        glossary_id: i64,
        user_id: i64,
    ) -> Result<Option<SyncResult>, AppError> {
        let sync_id = SyncId::glossary(glossary_id, user_id);
        if !self.registry.is_sync_needed(&sync_id) {
            return Ok(None);
        }
        self.sync_entries(glossary_id, user_id).await.map(Some)
    }

    /// Push offline entry ratings for a glossary.
    pub async fn sync_ratings(
        &self,
        glossary_id: Option<i64>,
        force: bool,
    ) -> Result<SyncResult, AppError> {
        let item_results = self
            .ratings
            .sync_ratings(
                GLOSSARY_COMPONENT,
                RATING_AREA_ENTRY,
                CONTEXT_LEVEL_MODULE,
                glossary_id,
                None,
                force,
            )
            .await?;

        let mut result = SyncResult::none();
        let mut seen = std::collections::HashSet::new();
        for item in &item_results {
            if !item.updated.is_empty() {
                result.updated = true;
                if seen.insert(item.item_set.instance_id) {
                    best_effort(self.remote.invalidate_entries(item.item_set.instance_id)).await;
                }
            }
            result.warnings.extend(item.warnings.iter().cloned());
        }
        Ok(result)
    }

    async fn entries_pass(&self, glossary_id: i64, user_id: i64) -> Result<SyncResult, AppError> {
        info!("Syncing entries of glossary {} for user {}", glossary_id, user_id);

        best_effort(self.logs.replay(GLOSSARY_COMPONENT, glossary_id)).await;

        let pending = best_effort_or(
            self.store.entries_for_glossary(glossary_id, Some(user_id)),
            vec![],
        )
        .await;

        if pending.is_empty() {
            debug!("No pending entries for glossary {}", glossary_id);
            self.registry
                .set_sync_time(&SyncId::glossary(glossary_id, user_id));
            return Ok(SyncResult::none());
        }

        if !self.connectivity.is_online().await {
            return Err(AppError::Connectivity(
                "cannot sync pending glossary entries while offline".into(),
            ));
        }

        let outcomes =
            join_all(pending.into_iter().map(|entry| self.submit_entry(entry))).await;

        let (result, first_error) = collect_outcomes(outcomes);

        if result.updated {
            best_effort(self.remote.invalidate_entries(glossary_id)).await;
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        self.registry
            .set_sync_time(&SyncId::glossary(glossary_id, user_id));
        Ok(result)
    }

    async fn submit_entry(&self, entry: PendingEntry) -> Result<SyncResult, AppError> {
        let folder = DraftFolder::NewEntry {
            glossary_id: entry.glossary_id,
            time_created: entry.time_created,
        };

        let submit = async {
            let mut options = entry.options.clone();
            if let Some(draft_id) = upload_attachments(
                self.attachments.as_ref(),
                self.uploader.as_ref(),
                &folder,
                &options,
                GLOSSARY_COMPONENT,
                entry.glossary_id,
            )
            .await?
            {
                options.set_draft_item_id(draft_id);
            }

            self.remote
                .add_entry(entry.glossary_id, &entry.concept, &entry.definition, &options)
                .await
        };

        match submit.await {
            Ok(new_id) => {
                debug!("Pending entry '{}' created as entry {}", entry.concept, new_id);
                self.discard_entry(&entry, &folder).await?;
                Ok(SyncResult {
                    updated: true,
                    warnings: vec![],
                })
            }
            Err(err) if err.is_web_service_error() => {
                warn!("Server rejected pending entry '{}': {}", entry.concept, err);
                self.discard_entry(&entry, &folder).await?;
                Ok(SyncResult {
                    updated: true,
                    warnings: vec![offline_data_deleted_warning(&entry.concept, &err.to_string())],
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn discard_entry(&self, entry: &PendingEntry, folder: &DraftFolder) -> Result<(), AppError> {
        self.store
            .delete_entry(entry.glossary_id, entry.user_id, entry.time_created)
            .await?;
        best_effort(self.attachments.delete_folder(folder)).await;
        Ok(())
    }
}
