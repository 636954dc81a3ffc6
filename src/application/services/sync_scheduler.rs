use crate::application::ports::action_store::ActionStore;
use crate::application::ports::event_bus::{EventBus, SyncEvent};
use crate::application::services::forum_sync::ForumSyncService;
use crate::application::services::glossary_sync::GlossarySyncService;
use crate::domain::constants::{FORUM_AUTO_SYNCED, GLOSSARY_AUTO_SYNCED};
use crate::domain::entities::offline::SyncResult;
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Periodic background driver.
///
/// Walks the pending-action store, works out which `(parent, user)` pairs
/// have queued work, and runs each one's sync pass. One pair failing never
/// stops the walk; pairs that updated local state are announced on the
/// event bus.
pub struct SyncScheduler {
    config: SyncConfig,
    store: Arc<dyn ActionStore>,
    forum_sync: ForumSyncService,
    glossary_sync: GlossarySyncService,
    events: Arc<dyn EventBus>,
}

impl Clone for SyncScheduler {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: Arc::clone(&self.store),
            forum_sync: self.forum_sync.clone(),
            glossary_sync: self.glossary_sync.clone(),
            events: Arc::clone(&self.events),
        }
    }
}

impl SyncScheduler {
    pub fn new(
        config: SyncConfig,
        store: Arc<dyn ActionStore>,
        forum_sync: ForumSyncService,
        glossary_sync: GlossarySyncService,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            config,
            store,
            forum_sync,
            glossary_sync,
            events,
        }
    }

    /// Sync everything that has queued work. With `force` unset, pairs that
    /// synced recently are skipped via the registry's interval gate.
    pub async fn sync_all(&self, force: bool) -> Result<(), AppError> {
        info!("Running full sync pass (force: {})", force);

        self.sync_pending_discussions(force).await;
        self.sync_pending_replies(force).await;
        self.sync_pending_entries(force).await;

        Ok(())
    }

    /// Spawn the periodic loop. Honors `auto_sync`; the handle can be
    /// aborted to stop the loop.
    pub fn run_periodic(&self) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.auto_sync {
            debug!("Auto sync disabled, periodic loop not started");
            return None;
        }

        let scheduler = self.clone();
        let interval = std::time::Duration::from_secs(self.config.sync_interval.max(1));
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh start
            // does not race app init.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = scheduler.sync_all(false).await {
                    error!("Periodic sync pass failed: {}", e);
                }
            }
        }))
    }

    async fn sync_pending_discussions(&self, force: bool) {
        let pending = match self.store.all_discussions().await {
            Ok(pending) => pending,
            Err(e) => {
                error!("Could not list pending discussions: {}", e);
                return;
            }
        };

        let mut seen = HashSet::new();
        for draft in pending {
            let key = (draft.forum_id, draft.user_id);
            if !seen.insert(key) {
                continue;
            }
            let outcome = if force {
                self.forum_sync
                    .sync_new_discussions(draft.forum_id, draft.user_id)
                    .await
                    .map(Some)
            } else {
                self.forum_sync
                    .sync_new_discussions_if_needed(draft.forum_id, draft.user_id)
                    .await
            };
            self.announce(
                outcome,
                FORUM_AUTO_SYNCED,
                draft.forum_id,
                None,
                draft.user_id,
            );
        }
    }

    async fn sync_pending_replies(&self, force: bool) {
        let pending = match self.store.all_replies().await {
            Ok(pending) => pending,
            Err(e) => {
                error!("Could not list pending replies: {}", e);
                return;
            }
        };

        let mut seen = HashSet::new();
        for reply in pending {
            let key = (reply.discussion_id, reply.user_id);
            if !seen.insert(key) {
                continue;
            }
            let outcome = if force {
                self.forum_sync
                    .sync_discussion_replies(reply.discussion_id, reply.user_id)
                    .await
                    .map(Some)
            } else {
                self.forum_sync
                    .sync_discussion_replies_if_needed(reply.discussion_id, reply.user_id)
                    .await
            };
            self.announce(
                outcome,
                FORUM_AUTO_SYNCED,
                reply.forum_id,
                Some(reply.discussion_id),
                reply.user_id,
            );
        }
    }

    async fn sync_pending_entries(&self, force: bool) {
        let pending = match self.store.all_entries().await {
            Ok(pending) => pending,
            Err(e) => {
                error!("Could not list pending glossary entries: {}", e);
                return;
            }
        };

        let mut seen = HashSet::new();
        for entry in pending {
            let key = (entry.glossary_id, entry.user_id);
            if !seen.insert(key) {
                continue;
            }
            let outcome = if force {
                self.glossary_sync
                    .sync_entries(entry.glossary_id, entry.user_id)
                    .await
                    .map(Some)
            } else {
                self.glossary_sync
                    .sync_entries_if_needed(entry.glossary_id, entry.user_id)
                    .await
            };
            self.announce(
                outcome,
                GLOSSARY_AUTO_SYNCED,
                entry.glossary_id,
                None,
                entry.user_id,
            );
        }
    }

    fn announce(
        &self,
        outcome: Result<Option<SyncResult>, AppError>,
        event: &str,
        resource_id: i64,
        discussion_id: Option<i64>,
        user_id: i64,
    ) {
        match outcome {
            Ok(Some(result)) if result.updated => {
                self.events.trigger(SyncEvent {
                    event: event.to_string(),
                    resource_id,
                    discussion_id,
                    user_id,
                    warnings: result.warnings,
                });
            }
            Ok(_) => {}
            Err(e) => {
                // Connectivity or per-pair failures leave the records queued
                // for the next tick.
                debug!("Background sync of resource {} skipped: {}", resource_id, e);
            }
        }
    }
}
