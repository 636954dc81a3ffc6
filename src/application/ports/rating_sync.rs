use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity of one set of rated items (e.g. the posts of one discussion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingItemSet {
    pub item_set_id: i64,
    pub course_id: i64,
    pub instance_id: i64,
}

/// Result of syncing the offline ratings of one item set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSyncItemResult {
    pub item_set: RatingItemSet,
    /// Ids of items whose rating was applied; their detail caches are stale.
    pub updated: Vec<i64>,
    pub warnings: Vec<String>,
}

/// Generalized rating sync collaborator, keyed by
/// (component, area, context level, instance).
#[async_trait]
pub trait RatingSync: Send + Sync {
    async fn sync_ratings(
        &self,
        component: &str,
        rating_area: &str,
        context_level: &str,
        instance_id: Option<i64>,
        item_set_id: Option<i64>,
        force: bool,
    ) -> Result<Vec<RatingSyncItemResult>, AppError>;
}
