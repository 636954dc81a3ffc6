use crate::application::ports::cache::CacheStrategy;
use crate::domain::entities::forum::{DiscussionSort, DiscussionsPage, Post};
use crate::domain::value_objects::ActionOptions;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Remote forum API.
///
/// Reads honor the given [`CacheStrategy`] and derive their cache key from
/// the semantic parameters. Writes always hit the network and never touch
/// the read cache; callers invalidate the affected keys after a successful
/// write via the `invalidate_*` operations.
#[async_trait]
pub trait ForumRemote: Send + Sync {
    async fn discussions(
        &self,
        forum_id: i64,
        sort: DiscussionSort,
        page: u32,
        strategy: CacheStrategy,
    ) -> Result<DiscussionsPage, AppError>;

    async fn discussion_posts(
        &self,
        discussion_id: i64,
        strategy: CacheStrategy,
    ) -> Result<Vec<Post>, AppError>;

    async fn can_add_discussion(
        &self,
        forum_id: i64,
        strategy: CacheStrategy,
    ) -> Result<bool, AppError>;

    /// Create a discussion; returns the new discussion id.
    async fn add_discussion(
        &self,
        forum_id: i64,
        subject: &str,
        message: &str,
        options: &ActionOptions,
        group_id: i64,
    ) -> Result<i64, AppError>;

    /// Reply to a post; returns the new post id.
    async fn reply_post(
        &self,
        post_id: i64,
        subject: &str,
        message: &str,
        options: &ActionOptions,
    ) -> Result<i64, AppError>;

    async fn invalidate_discussions_list(&self, forum_id: i64) -> Result<(), AppError>;
    async fn invalidate_can_add_discussion(&self, forum_id: i64) -> Result<(), AppError>;
    async fn invalidate_discussion_posts(&self, discussion_id: i64) -> Result<(), AppError>;
}
