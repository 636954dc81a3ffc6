use crate::domain::value_objects::ActionOptions;
use serde::{Deserialize, Serialize};

/// A reply to an existing post saved while offline.
///
/// Identity is `(post_id, user_id)`: a user holds at most one pending reply
/// per post, which also blocks double-replying to the same parent in one
/// offline session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReply {
    /// Post being replied to.
    pub post_id: i64,
    pub discussion_id: i64,
    pub forum_id: i64,
    /// Forum name, kept for user-facing warnings.
    pub name: String,
    pub course_id: i64,
    pub subject: String,
    pub message: String,
    pub options: ActionOptions,
    pub user_id: i64,
    pub time_created: i64,
}

impl PendingReply {
    pub fn identity(&self) -> (i64, i64) {
        (self.post_id, self.user_id)
    }
}
