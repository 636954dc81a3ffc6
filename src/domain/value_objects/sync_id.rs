use serde::{Deserialize, Serialize};
use std::fmt;

/// Key identifying one lockable unit of synchronization work.
///
/// Two callers syncing the same resource for the same user produce the same
/// id and therefore share one in-flight pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncId(String);

impl SyncId {
    pub fn forum(forum_id: i64, user_id: i64) -> Self {
        Self(format!("forum#{forum_id}#{user_id}"))
    }

    pub fn discussion(discussion_id: i64, user_id: i64) -> Self {
        Self(format!("discussion#{discussion_id}#{user_id}"))
    }

    pub fn glossary(glossary_id: i64, user_id: i64) -> Self {
        Self(format!("glossary#{glossary_id}#{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SyncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SyncId> for String {
    fn from(id: SyncId) -> Self {
        id.0
    }
}
