use crate::domain::entities::forum::{Discussion, Post};
use crate::domain::entities::glossary::GlossaryEntry;
use serde::{Deserialize, Serialize};

/// Provenance of a merged-view item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    Online,
    Offline,
}

/// A discussion as shown in a merged list: either a real remote discussion
/// or a virtual item synthesized from a pending offline draft. Virtual
/// items carry a negative id so they can never collide with remote ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionItem {
    pub source: ItemSource,
    pub discussion: Discussion,
}

impl DiscussionItem {
    pub fn online(discussion: Discussion) -> Self {
        Self {
            source: ItemSource::Online,
            discussion,
        }
    }

    pub fn offline(discussion: Discussion) -> Self {
        Self {
            source: ItemSource::Offline,
            discussion,
        }
    }
}

/// A post in a merged threaded view. `can_reply` is cleared on posts that
/// already have a pending offline reply queued against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostItem {
    pub source: ItemSource,
    pub post: Post,
    pub can_reply: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryItem {
    pub source: ItemSource,
    pub entry: GlossaryEntry,
}

/// Ordered, duplicate-free merge of remote and locally-queued items.
///
/// `fetch_failed` distinguishes "the remote fetch failed and nothing was
/// cached" from an empty result, so callers never mistake failure for zero
/// content. Local items never influence `can_load_more`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedView<T> {
    pub items: Vec<T>,
    pub can_load_more: bool,
    pub fetch_failed: bool,
}

impl<T> MergedView<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            can_load_more: false,
            fetch_failed: false,
        }
    }
}
