//! Port mocks shared by the service unit tests.

use crate::application::ports::action_store::ActionStore;
use crate::application::ports::activity_log::ActivityLogQueue;
use crate::application::ports::attachments::{AttachmentStore, DraftFolder, FileUploader};
use crate::application::ports::cache::CacheStrategy;
use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::event_bus::{EventBus, SyncEvent};
use crate::application::ports::forum_remote::ForumRemote;
use crate::application::ports::glossary_remote::GlossaryRemote;
use crate::application::ports::profiles::{ProfileLookup, UserProfile};
use crate::application::ports::rating_sync::{RatingSync, RatingSyncItemResult};
use crate::domain::entities::forum::{DiscussionSort, DiscussionsPage, Post};
use crate::domain::entities::glossary::{EntriesPage, EntryFetchMode, GlossaryEntry};
use crate::domain::entities::offline::{PendingDiscussion, PendingEntry, PendingReply};
use crate::domain::value_objects::{ActionOptions, FileRef};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// In-memory [`ActionStore`] with the same identity rules as the SQLite
/// implementation.
#[derive(Default)]
pub struct MemoryActionStore {
    pub discussions: Mutex<Vec<PendingDiscussion>>,
    pub replies: Mutex<Vec<PendingReply>>,
    pub entries: Mutex<Vec<PendingEntry>>,
}

#[async_trait]
impl ActionStore for MemoryActionStore {
    async fn add_discussion(&self, discussion: PendingDiscussion) -> Result<(), AppError> {
        let mut discussions = self.discussions.lock().unwrap();
        if discussions
            .iter()
            .any(|d| d.identity() == discussion.identity())
        {
            return Err(AppError::DuplicateKey(format!(
                "pending discussion {:?} already exists",
                discussion.identity()
            )));
        }
        discussions.push(discussion);
        Ok(())
    }

    async fn delete_discussion(
        &self,
        forum_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError> {
        self.discussions
            .lock()
            .unwrap()
            .retain(|d| d.identity() != (forum_id, user_id, time_created));
        Ok(())
    }

    async fn discussions_for_forum(
        &self,
        forum_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingDiscussion>, AppError> {
        let mut matches: Vec<_> = self
            .discussions
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.forum_id == forum_id && user_id.map_or(true, |u| d.user_id == u))
            .cloned()
            .collect();
        matches.sort_by_key(|d| std::cmp::Reverse(d.time_created));
        Ok(matches)
    }

    async fn all_discussions(&self) -> Result<Vec<PendingDiscussion>, AppError> {
        Ok(self.discussions.lock().unwrap().clone())
    }

    async fn add_reply(&self, reply: PendingReply) -> Result<(), AppError> {
        let mut replies = self.replies.lock().unwrap();
        if replies.iter().any(|r| r.identity() == reply.identity()) {
            return Err(AppError::DuplicateKey(format!(
                "pending reply {:?} already exists",
                reply.identity()
            )));
        }
        replies.push(reply);
        Ok(())
    }

    async fn delete_reply(&self, post_id: i64, user_id: i64) -> Result<(), AppError> {
        self.replies
            .lock()
            .unwrap()
            .retain(|r| r.identity() != (post_id, user_id));
        Ok(())
    }

    async fn replies_for_discussion(
        &self,
        discussion_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingReply>, AppError> {
        Ok(self
            .replies
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.discussion_id == discussion_id && user_id.map_or(true, |u| r.user_id == u))
            .cloned()
            .collect())
    }

    async fn replies_for_forum(
        &self,
        forum_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingReply>, AppError> {
        Ok(self
            .replies
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.forum_id == forum_id && user_id.map_or(true, |u| r.user_id == u))
            .cloned()
            .collect())
    }

    async fn all_replies(&self) -> Result<Vec<PendingReply>, AppError> {
        Ok(self.replies.lock().unwrap().clone())
    }

    async fn add_entry(&self, entry: PendingEntry) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e.identity() == entry.identity()) {
            return Err(AppError::DuplicateKey(format!(
                "pending entry {:?} already exists",
                entry.identity()
            )));
        }
        entries.push(entry);
        Ok(())
    }

    async fn delete_entry(
        &self,
        glossary_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap()
            .retain(|e| e.identity() != (glossary_id, user_id, time_created));
        Ok(())
    }

    async fn entries_for_glossary(
        &self,
        glossary_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingEntry>, AppError> {
        let mut matches: Vec<_> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.glossary_id == glossary_id && user_id.map_or(true, |u| e.user_id == u))
            .cloned()
            .collect();
        matches.sort_by_key(|e| std::cmp::Reverse(e.time_created));
        Ok(matches)
    }

    async fn all_entries(&self) -> Result<Vec<PendingEntry>, AppError> {
        Ok(self.entries.lock().unwrap().clone())
    }
}

/// Scripted failure for mock write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteBehavior {
    #[default]
    Succeed,
    RejectWebService,
    FailConnectivity,
}

impl WriteBehavior {
    fn apply(&self) -> Result<i64, AppError> {
        match self {
            WriteBehavior::Succeed => Ok(1000),
            WriteBehavior::RejectWebService => Err(AppError::WebService(
                "the server rejected the submission".into(),
            )),
            WriteBehavior::FailConnectivity => {
                Err(AppError::Connectivity("request timed out".into()))
            }
        }
    }
}

pub struct MockForumRemote {
    pub behavior: Mutex<WriteBehavior>,
    pub submissions: AtomicU32,
    pub page: Mutex<Result<DiscussionsPage, AppError>>,
    pub posts: Mutex<Result<Vec<Post>, AppError>>,
    pub invalidated: Mutex<Vec<String>>,
}

impl Default for MockForumRemote {
    fn default() -> Self {
        Self {
            behavior: Mutex::new(WriteBehavior::Succeed),
            submissions: AtomicU32::new(0),
            page: Mutex::new(Ok(DiscussionsPage {
                discussions: vec![],
                per_page: 10,
                total: 0,
            })),
            posts: Mutex::new(Ok(vec![])),
            invalidated: Mutex::new(vec![]),
        }
    }
}

impl MockForumRemote {
    pub fn submission_count(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForumRemote for MockForumRemote {
    async fn discussions(
        &self,
        _forum_id: i64,
        _sort: DiscussionSort,
        _page: u32,
        _strategy: CacheStrategy,
    ) -> Result<DiscussionsPage, AppError> {
        self.page.lock().unwrap().clone()
    }

    async fn discussion_posts(
        &self,
        _discussion_id: i64,
        _strategy: CacheStrategy,
    ) -> Result<Vec<Post>, AppError> {
        self.posts.lock().unwrap().clone()
    }

    async fn can_add_discussion(
        &self,
        _forum_id: i64,
        _strategy: CacheStrategy,
    ) -> Result<bool, AppError> {
        Ok(true)
    }

    async fn add_discussion(
        &self,
        _forum_id: i64,
        _subject: &str,
        _message: &str,
        _options: &ActionOptions,
        _group_id: i64,
    ) -> Result<i64, AppError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        // Hold the submission open long enough for racing callers to pile
        // up on the single-flight lock.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        self.behavior.lock().unwrap().apply()
    }

    async fn reply_post(
        &self,
        _post_id: i64,
        _subject: &str,
        _message: &str,
        _options: &ActionOptions,
    ) -> Result<i64, AppError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.behavior.lock().unwrap().apply()
    }

    async fn invalidate_discussions_list(&self, forum_id: i64) -> Result<(), AppError> {
        self.invalidated
            .lock()
            .unwrap()
            .push(format!("discussions:{forum_id}"));
        Ok(())
    }

    async fn invalidate_can_add_discussion(&self, forum_id: i64) -> Result<(), AppError> {
        self.invalidated
            .lock()
            .unwrap()
            .push(format!("can-add:{forum_id}"));
        Ok(())
    }

    async fn invalidate_discussion_posts(&self, discussion_id: i64) -> Result<(), AppError> {
        self.invalidated
            .lock()
            .unwrap()
            .push(format!("posts:{discussion_id}"));
        Ok(())
    }
}

pub struct MockGlossaryRemote {
    pub behavior: Mutex<WriteBehavior>,
    pub submissions: AtomicU32,
    pub page: Mutex<Result<EntriesPage, AppError>>,
    pub invalidated: Mutex<Vec<i64>>,
}

impl Default for MockGlossaryRemote {
    fn default() -> Self {
        Self {
            behavior: Mutex::new(WriteBehavior::Succeed),
            submissions: AtomicU32::new(0),
            page: Mutex::new(Ok(EntriesPage {
                entries: vec![],
                total: 0,
            })),
            invalidated: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl GlossaryRemote for MockGlossaryRemote {
    async fn entries(
        &self,
        _glossary_id: i64,
        _mode: &EntryFetchMode,
        _from: u32,
        _limit: u32,
        _strategy: CacheStrategy,
    ) -> Result<EntriesPage, AppError> {
        self.page.lock().unwrap().clone()
    }

    async fn cached_entries(&self, _glossary_id: i64) -> Result<Vec<GlossaryEntry>, AppError> {
        self.page.lock().unwrap().clone().map(|page| page.entries)
    }

    async fn add_entry(
        &self,
        _glossary_id: i64,
        _concept: &str,
        _definition: &str,
        _options: &ActionOptions,
    ) -> Result<i64, AppError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.behavior.lock().unwrap().apply()
    }

    async fn invalidate_entries(&self, glossary_id: i64) -> Result<(), AppError> {
        self.invalidated.lock().unwrap().push(glossary_id);
        Ok(())
    }
}

pub struct MockConnectivity {
    pub online: AtomicBool,
}

impl MockConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }
}

#[async_trait]
impl ConnectivityProbe for MockConnectivity {
    async fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Attachment store that records folder deletions.
#[derive(Default)]
pub struct MockAttachmentStore {
    pub staged: Mutex<Vec<(DraftFolder, Vec<FileRef>)>>,
    pub deleted: Mutex<Vec<DraftFolder>>,
}

#[async_trait]
impl AttachmentStore for MockAttachmentStore {
    async fn store_file(
        &self,
        folder: &DraftFolder,
        filename: &str,
        _data: &[u8],
    ) -> Result<(), AppError> {
        let mut staged = self.staged.lock().unwrap();
        if let Some((_, files)) = staged.iter_mut().find(|(f, _)| f == folder) {
            files.push(FileRef::local(filename));
        } else {
            staged.push((folder.clone(), vec![FileRef::local(filename)]));
        }
        Ok(())
    }

    async fn list_folder(&self, folder: &DraftFolder) -> Result<Vec<FileRef>, AppError> {
        self.staged
            .lock()
            .unwrap()
            .iter()
            .find(|(f, _)| f == folder)
            .map(|(_, files)| files.clone())
            .ok_or_else(|| AppError::NotFound("folder not found".into()))
    }

    async fn delete_folder(&self, folder: &DraftFolder) -> Result<(), AppError> {
        self.staged.lock().unwrap().retain(|(f, _)| f != folder);
        self.deleted.lock().unwrap().push(folder.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockUploader {
    pub uploads: Mutex<Vec<(Vec<FileRef>, String, i64)>>,
}

#[async_trait]
impl FileUploader for MockUploader {
    async fn upload_or_reupload(
        &self,
        files: &[FileRef],
        component: &str,
        item_id: i64,
    ) -> Result<i64, AppError> {
        self.uploads
            .lock()
            .unwrap()
            .push((files.to_vec(), component.to_string(), item_id));
        Ok(7777)
    }
}

#[derive(Default)]
pub struct MockRatingSync {
    pub results: Mutex<Vec<RatingSyncItemResult>>,
}

#[async_trait]
impl RatingSync for MockRatingSync {
    async fn sync_ratings(
        &self,
        _component: &str,
        _rating_area: &str,
        _context_level: &str,
        _instance_id: Option<i64>,
        _item_set_id: Option<i64>,
        _force: bool,
    ) -> Result<Vec<RatingSyncItemResult>, AppError> {
        Ok(self.results.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MockLogQueue {
    pub replayed: Mutex<Vec<(String, i64)>>,
}

#[async_trait]
impl ActivityLogQueue for MockLogQueue {
    async fn replay(&self, component: &str, instance_id: i64) -> Result<(), AppError> {
        self.replayed
            .lock()
            .unwrap()
            .push((component.to_string(), instance_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockEventBus {
    pub events: Mutex<Vec<SyncEvent>>,
}

impl EventBus for MockEventBus {
    fn trigger(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct MockProfiles {
    pub profile: Option<UserProfile>,
}

#[async_trait]
impl ProfileLookup for MockProfiles {
    async fn profile(&self, user_id: i64) -> Result<UserProfile, AppError> {
        self.profile
            .clone()
            .ok_or_else(|| AppError::NotFound(format!("no profile for user {user_id}")))
    }
}
