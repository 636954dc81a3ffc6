use crate::domain::value_objects::ActionOptions;
use serde::{Deserialize, Serialize};

/// A new discussion saved while offline (or after a failed online attempt),
/// waiting to be submitted.
///
/// Identity is `(forum_id, user_id, time_created)` so one user can hold
/// several drafts against the same forum at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDiscussion {
    pub forum_id: i64,
    /// Forum name, kept for user-facing warnings.
    pub name: String,
    pub course_id: i64,
    pub subject: String,
    pub message: String,
    pub options: ActionOptions,
    pub group_id: i64,
    pub user_id: i64,
    pub time_created: i64,
}

impl PendingDiscussion {
    pub fn identity(&self) -> (i64, i64, i64) {
        (self.forum_id, self.user_id, self.time_created)
    }
}
