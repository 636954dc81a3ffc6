use crate::application::ports::action_store::ActionStore;
use crate::application::ports::cache::CacheStrategy;
use crate::application::ports::glossary_remote::GlossaryRemote;
use crate::application::ports::profiles::ProfileLookup;
use crate::domain::entities::glossary::{EntryFetchMode, GlossaryEntry};
use crate::domain::entities::offline::PendingEntry;
use crate::domain::entities::view::{EntryItem, ItemSource, MergedView};
use crate::shared::best_effort::{best_effort, best_effort_or};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::warn;

/// Builds the merged glossary listing a screen renders.
pub struct GlossaryViewBuilder {
    store: Arc<dyn ActionStore>,
    remote: Arc<dyn GlossaryRemote>,
    profiles: Arc<dyn ProfileLookup>,
}

impl Clone for GlossaryViewBuilder {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            remote: Arc::clone(&self.remote),
            profiles: Arc::clone(&self.profiles),
        }
    }
}

impl GlossaryViewBuilder {
    pub fn new(
        store: Arc<dyn ActionStore>,
        remote: Arc<dyn GlossaryRemote>,
        profiles: Arc<dyn ProfileLookup>,
    ) -> Self {
        Self {
            store,
            remote,
            profiles,
        }
    }

    /// One page of entries for the given browse mode with the user's queued
    /// entries on top. Queued entries only appear on the first page
    /// (`from == 0`); `can_load_more` reflects the server total alone.
    pub async fn merged_entries(
        &self,
        glossary_id: i64,
        user_id: i64,
        mode: &EntryFetchMode,
        from: u32,
        limit: u32,
        strategy: CacheStrategy,
    ) -> Result<MergedView<EntryItem>, AppError> {
        let pending = if from == 0 {
            best_effort_or(self.store.entries_for_glossary(glossary_id, Some(user_id)), vec![])
                .await
        } else {
            vec![]
        };

        let fetched = self
            .remote
            .entries(glossary_id, mode, from, limit, strategy)
            .await;

        let mut view = MergedView::empty();
        for draft in &pending {
            view.items.push(EntryItem {
                source: ItemSource::Offline,
                entry: self.virtual_entry(draft).await,
            });
        }

        match fetched {
            Ok(page) => {
                view.can_load_more = from + (page.entries.len() as u32) < page.total;
                view.items.extend(page.entries.into_iter().map(|entry| EntryItem {
                    source: ItemSource::Online,
                    entry,
                }));
            }
            Err(err) if !view.items.is_empty() => {
                warn!("Entry fetch for glossary {} failed: {}", glossary_id, err);
                view.fetch_failed = true;
            }
            Err(err) => return Err(err),
        }

        Ok(view)
    }

    async fn virtual_entry(&self, draft: &PendingEntry) -> GlossaryEntry {
        let profile = best_effort(self.profiles.profile(draft.user_id)).await;
        GlossaryEntry {
            id: -draft.time_created,
            glossary_id: draft.glossary_id,
            concept: draft.concept.clone(),
            definition: draft.definition.clone(),
            user_id: draft.user_id,
            user_full_name: profile.map(|p| p.full_name),
            time_created: draft.time_created,
        }
    }
}
