use serde::{Deserialize, Serialize};

/// Notification that a background sync pass changed local state for a
/// resource, so any visible screen showing it can refresh itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// One of the `*_AUTO_SYNCED` event names in `domain::constants`.
    pub event: String,
    /// Owning activity instance (forum or glossary id).
    pub resource_id: i64,
    /// Set for reply syncs, which are keyed per discussion.
    pub discussion_id: Option<i64>,
    pub user_id: i64,
    pub warnings: Vec<String>,
}

/// App-wide event fan-out. The sync coordinator returns its result to the
/// caller directly and additionally publishes here for any other listener.
pub trait EventBus: Send + Sync {
    fn trigger(&self, event: SyncEvent);
}
