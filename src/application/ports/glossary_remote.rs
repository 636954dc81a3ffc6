use crate::application::ports::cache::CacheStrategy;
use crate::domain::entities::glossary::{EntriesPage, EntryFetchMode, GlossaryEntry};
use crate::domain::value_objects::ActionOptions;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Remote glossary API; same caching contract as
/// [`ForumRemote`](crate::application::ports::forum_remote::ForumRemote).
#[async_trait]
pub trait GlossaryRemote: Send + Sync {
    async fn entries(
        &self,
        glossary_id: i64,
        mode: &EntryFetchMode,
        from: u32,
        limit: u32,
        strategy: CacheStrategy,
    ) -> Result<EntriesPage, AppError>;

    /// Every entry currently present in the read cache for the glossary,
    /// regardless of the fetch mode and paging that populated it. Never
    /// touches the network; an empty result only means nothing is cached.
    async fn cached_entries(&self, glossary_id: i64) -> Result<Vec<GlossaryEntry>, AppError>;

    /// Create an entry; returns the new entry id.
    async fn add_entry(
        &self,
        glossary_id: i64,
        concept: &str,
        definition: &str,
        options: &ActionOptions,
    ) -> Result<i64, AppError>;

    /// Drop every cached entry listing of the glossary, across all fetch
    /// modes.
    async fn invalidate_entries(&self, glossary_id: i64) -> Result<(), AppError>;
}
