use crate::domain::value_objects::ActionOptions;
use serde::{Deserialize, Serialize};

/// A new glossary entry saved while offline.
///
/// Identity is `(glossary_id, user_id, time_created)`, the same draft model
/// as pending discussions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub glossary_id: i64,
    pub course_id: i64,
    pub concept: String,
    pub definition: String,
    pub options: ActionOptions,
    pub user_id: i64,
    pub time_created: i64,
}

impl PendingEntry {
    pub fn identity(&self) -> (i64, i64, i64) {
        (self.glossary_id, self.user_id, self.time_created)
    }
}
