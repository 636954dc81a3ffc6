use crate::domain::entities::offline::{PendingDiscussion, PendingEntry, PendingReply};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Persistent store of pending offline actions.
///
/// Each record kind has its own composite identity; adding a record whose
/// identity already exists fails with [`AppError::DuplicateKey`] (the
/// caller must delete the old draft first). Deletes of absent records are
/// no-ops, reads of absent parents return empty lists. The store performs
/// no network calls.
#[async_trait]
pub trait ActionStore: Send + Sync {
    async fn add_discussion(&self, discussion: PendingDiscussion) -> Result<(), AppError>;
    async fn delete_discussion(
        &self,
        forum_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError>;
    /// Pending discussions for one forum, optionally restricted to a user.
    /// Newest first.
    async fn discussions_for_forum(
        &self,
        forum_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingDiscussion>, AppError>;
    /// Every pending discussion across all forums; used by the scheduler to
    /// discover sync work.
    async fn all_discussions(&self) -> Result<Vec<PendingDiscussion>, AppError>;

    async fn add_reply(&self, reply: PendingReply) -> Result<(), AppError>;
    async fn delete_reply(&self, post_id: i64, user_id: i64) -> Result<(), AppError>;
    async fn replies_for_discussion(
        &self,
        discussion_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingReply>, AppError>;
    async fn replies_for_forum(
        &self,
        forum_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingReply>, AppError>;
    async fn all_replies(&self) -> Result<Vec<PendingReply>, AppError>;

    async fn add_entry(&self, entry: PendingEntry) -> Result<(), AppError>;
    async fn delete_entry(
        &self,
        glossary_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError>;
    async fn entries_for_glossary(
        &self,
        glossary_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingEntry>, AppError>;
    async fn all_entries(&self) -> Result<Vec<PendingEntry>, AppError>;
}
