use serde::{Deserialize, Serialize};

/// Sort orders the server understands for discussion listings. Part of the
/// cache key of the corresponding read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionSort {
    LastPostDesc,
    CreatedDesc,
    RepliesDesc,
}

impl DiscussionSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionSort::LastPostDesc => "lastpost_desc",
            DiscussionSort::CreatedDesc => "created_desc",
            DiscussionSort::RepliesDesc => "replies_desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discussion {
    pub id: i64,
    pub forum_id: i64,
    pub subject: String,
    pub message: String,
    pub group_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub user_full_name: Option<String>,
    #[serde(default)]
    pub user_picture_url: Option<String>,
    pub time_created: i64,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub num_replies: u32,
}

/// One page of remote discussions plus the server-reported total for the
/// requested filter. The total and the page size the client requested
/// drive the "can load more" flag; the final page may hold fewer than
/// `per_page` discussions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionsPage {
    pub discussions: Vec<Discussion>,
    pub per_page: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub discussion_id: i64,
    /// Parent post; `None` for the discussion's opening post.
    pub parent_id: Option<i64>,
    pub subject: String,
    pub message: String,
    pub user_id: i64,
    #[serde(default)]
    pub user_full_name: Option<String>,
    #[serde(default)]
    pub user_picture_url: Option<String>,
    pub time_created: i64,
}
