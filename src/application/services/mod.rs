pub mod forum_offline;
pub mod forum_sync;
pub mod glossary_offline;
pub mod glossary_sync;
mod helpers;
pub mod sync_registry;
pub mod sync_scheduler;
pub mod view_builder;

#[cfg(test)]
pub(crate) mod testing;

pub use forum_offline::ForumOfflineService;
pub use forum_sync::ForumSyncService;
pub use glossary_offline::GlossaryOfflineService;
pub use glossary_sync::GlossarySyncService;
pub use sync_registry::SyncRegistry;
pub use sync_scheduler::SyncScheduler;
pub use view_builder::{ForumViewBuilder, GlossaryViewBuilder};
