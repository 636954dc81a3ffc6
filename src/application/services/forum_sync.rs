use crate::application::ports::action_store::ActionStore;
use crate::application::ports::activity_log::ActivityLogQueue;
use crate::application::ports::attachments::{AttachmentStore, DraftFolder, FileUploader};
use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::forum_remote::ForumRemote;
use crate::application::ports::rating_sync::{RatingSync, RatingSyncItemResult};
use crate::application::services::helpers::{offline_data_deleted_warning, upload_attachments};
use crate::application::services::sync_registry::SyncRegistry;
use crate::domain::constants::{CONTEXT_LEVEL_MODULE, FORUM_COMPONENT, RATING_AREA_POST};
use crate::domain::entities::offline::{PendingDiscussion, PendingReply, SyncResult};
use crate::domain::value_objects::SyncId;
use crate::shared::best_effort::{best_effort, best_effort_or};
use crate::shared::error::AppError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Submits the pending forum actions of one user to the server.
///
/// Passes are registered with the shared [`SyncRegistry`], so each
/// `(forum or discussion, user)` pair has at most one pass in flight and a
/// blocked id rejects new passes outright.
pub struct ForumSyncService {
    registry: Arc<SyncRegistry>,
    store: Arc<dyn ActionStore>,
    remote: Arc<dyn ForumRemote>,
    connectivity: Arc<dyn ConnectivityProbe>,
    attachments: Arc<dyn AttachmentStore>,
    uploader: Arc<dyn FileUploader>,
    ratings: Arc<dyn RatingSync>,
    logs: Arc<dyn ActivityLogQueue>,
}

impl Clone for ForumSyncService {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
            remote: Arc::clone(&self.remote),
            connectivity: Arc::clone(&self.connectivity),
            attachments: Arc::clone(&self.attachments),
            uploader: Arc::clone(&self.uploader),
            ratings: Arc::clone(&self.ratings),
            logs: Arc::clone(&self.logs),
        }
    }
}

impl ForumSyncService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<SyncRegistry>,
        store: Arc<dyn ActionStore>,
        remote: Arc<dyn ForumRemote>,
        connectivity: Arc<dyn ConnectivityProbe>,
        attachments: Arc<dyn AttachmentStore>,
        uploader: Arc<dyn FileUploader>,
        ratings: Arc<dyn RatingSync>,
        logs: Arc<dyn ActivityLogQueue>,
    ) -> Self {
        Self {
            registry,
            store,
            remote,
            connectivity,
            attachments,
            uploader,
            ratings,
            logs,
        }
    }

    pub fn registry(&self) -> &Arc<SyncRegistry> {
        &self.registry
    }

    /// Sync the pending new discussions of `user_id` against `forum_id`.
    pub async fn sync_new_discussions(
        &self,
        forum_id: i64,
        user_id: i64,
    ) -> Result<SyncResult, AppError> {
        let sync_id = SyncId::forum(forum_id, user_id);
        let service = self.clone();
        self.registry
            .run(sync_id, async move {
                service.discussions_pass(forum_id, user_id).await
            })
            .await
    }

    /// Like [`sync_new_discussions`](Self::sync_new_discussions), but skips
    /// the pass when one ran recently. Returns `None` when skipped.
    pub async fn sync_new_discussions_if_needed(
        &self,
        forum_id: i64,
        user_id: i64,
    ) -> Result<Option<SyncResult>, AppError> {
        let sync_id = SyncId::forum(forum_id, user_id);
        if !self.registry.is_sync_needed(&sync_id) {
            return Ok(None);
        }
        self.sync_new_discussions(forum_id, user_id).await.map(Some)
    }

    /// Sync the pending replies of `user_id` inside `discussion_id`.
    pub async fn sync_discussion_replies(
        &self,
        discussion_id: i64,
        user_id: i64,
    ) -> Result<SyncResult, AppError> {
        let sync_id = SyncId::discussion(discussion_id, user_id);
        let service = self.clone();
        self.registry
            .run(sync_id, async move {
                service.replies_pass(discussion_id, user_id).await
            })
            .await
    }

    pub async fn sync_discussion_replies_if_needed(
        &self,
        discussion_id: i64,
        user_id: i64,
    ) -> Result<Option<SyncResult>, AppError> {
        let sync_id = SyncId::discussion(discussion_id, user_id);
        if !self.registry.is_sync_needed(&sync_id) {
            return Ok(None);
        }
        self.sync_discussion_replies(discussion_id, user_id)
            .await
            .map(Some)
    }

    /// Push offline post ratings for a forum (or a single discussion of it)
    /// and collect the warnings into a [`SyncResult`].
    pub async fn sync_ratings(
        &self,
        forum_id: Option<i64>,
        discussion_id: Option<i64>,
        force: bool,
    ) -> Result<SyncResult, AppError> {
        let item_results = self
            .ratings
            .sync_ratings(
                FORUM_COMPONENT,
                RATING_AREA_POST,
                CONTEXT_LEVEL_MODULE,
                forum_id,
                discussion_id,
                force,
            )
            .await?;

        let mut result = SyncResult::none();
        for item in &item_results {
            if !item.updated.is_empty() {
                result.updated = true;
                best_effort(self.remote.invalidate_discussion_posts(item.item_set.item_set_id))
                    .await;
            }
            result.warnings.extend(item.warnings.iter().cloned());
        }
        self.invalidate_rated_lists(&item_results).await;
        Ok(result)
    }

    async fn invalidate_rated_lists(&self, item_results: &[RatingSyncItemResult]) {
        let mut seen = std::collections::HashSet::new();
        for item in item_results {
            if !item.updated.is_empty() && seen.insert(item.item_set.instance_id) {
                best_effort(self.remote.invalidate_discussions_list(item.item_set.instance_id))
                    .await;
            }
        }
    }

    async fn discussions_pass(&self, forum_id: i64, user_id: i64) -> Result<SyncResult, AppError> {
        info!("Syncing new discussions of forum {} for user {}", forum_id, user_id);

        best_effort(self.logs.replay(FORUM_COMPONENT, forum_id)).await;

        let pending = best_effort_or(
            self.store.discussions_for_forum(forum_id, Some(user_id)),
            vec![],
        )
        .await;

        if pending.is_empty() {
            debug!("No pending discussions for forum {}", forum_id);
            let result = SyncResult::none();
            self.registry
                .set_sync_time(&SyncId::forum(forum_id, user_id));
            return Ok(result);
        }

        if !self.connectivity.is_online().await {
            return Err(AppError::Connectivity(
                "cannot sync pending discussions while offline".into(),
            ));
        }

        let outcomes = join_all(
            pending
                .into_iter()
                .map(|discussion| self.submit_discussion(discussion)),
        )
        .await;

        let (result, first_error) = collect_outcomes(outcomes);

        if result.updated {
            best_effort(self.remote.invalidate_discussions_list(forum_id)).await;
            best_effort(self.remote.invalidate_can_add_discussion(forum_id)).await;
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        self.registry
            .set_sync_time(&SyncId::forum(forum_id, user_id));
        Ok(result)
    }

    async fn replies_pass(&self, discussion_id: i64, user_id: i64) -> Result<SyncResult, AppError> {
        info!("Syncing replies of discussion {} for user {}", discussion_id, user_id);

        let pending = best_effort_or(
            self.store.replies_for_discussion(discussion_id, Some(user_id)),
            vec![],
        )
        .await;

        if pending.is_empty() {
            self.registry
                .set_sync_time(&SyncId::discussion(discussion_id, user_id));
            return Ok(SyncResult::none());
        }

        if !self.connectivity.is_online().await {
            return Err(AppError::Connectivity(
                "cannot sync pending replies while offline".into(),
            ));
        }

        let forum_id = pending[0].forum_id;
        best_effort(self.logs.replay(FORUM_COMPONENT, forum_id)).await;

        let outcomes =
            join_all(pending.into_iter().map(|reply| self.submit_reply(reply))).await;

        let (result, first_error) = collect_outcomes(outcomes);

        if result.updated {
            best_effort(self.remote.invalidate_discussions_list(forum_id)).await;
            best_effort(self.remote.invalidate_discussion_posts(discussion_id)).await;
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        self.registry
            .set_sync_time(&SyncId::discussion(discussion_id, user_id));
        Ok(result)
    }

    /// Submit one pending discussion. A server-side rejection discards the
    /// record with a warning; a connectivity failure keeps it for retry.
    async fn submit_discussion(
        &self,
        discussion: PendingDiscussion,
    ) -> Result<SyncResult, AppError> {
        let folder = DraftFolder::NewDiscussion {
            forum_id: discussion.forum_id,
            time_created: discussion.time_created,
        };

        let submit = async {
            let mut options = discussion.options.clone();
            if let Some(draft_id) = upload_attachments(
                self.attachments.as_ref(),
                self.uploader.as_ref(),
                &folder,
                &options,
                FORUM_COMPONENT,
                discussion.forum_id,
            )
            .await?
            {
                options.set_draft_item_id(draft_id);
            }

            self.remote
                .add_discussion(
                    discussion.forum_id,
                    &discussion.subject,
                    &discussion.message,
                    &options,
                    discussion.group_id,
                )
                .await
        };

        match submit.await {
            Ok(new_id) => {
                debug!(
                    "Pending discussion '{}' created as discussion {}",
                    discussion.subject, new_id
                );
                self.discard_discussion(&discussion, &folder).await?;
                Ok(SyncResult {
                    updated: true,
                    warnings: vec![],
                })
            }
            Err(err) if err.is_web_service_error() => {
                warn!(
                    "Server rejected pending discussion '{}': {}",
                    discussion.subject, err
                );
                self.discard_discussion(&discussion, &folder).await?;
                Ok(SyncResult {
                    updated: true,
                    warnings: vec![offline_data_deleted_warning(
                        &discussion.subject,
                        &err.to_string(),
                    )],
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn submit_reply(&self, reply: PendingReply) -> Result<SyncResult, AppError> {
        let folder = DraftFolder::Reply {
            forum_id: reply.forum_id,
            post_id: reply.post_id,
            user_id: reply.user_id,
        };

        let submit = async {
            let mut options = reply.options.clone();
            if let Some(draft_id) = upload_attachments(
                self.attachments.as_ref(),
                self.uploader.as_ref(),
                &folder,
                &options,
                FORUM_COMPONENT,
                reply.forum_id,
            )
            .await?
            {
                options.set_draft_item_id(draft_id);
            }

            self.remote
                .reply_post(reply.post_id, &reply.subject, &reply.message, &options)
                .await
        };

        match submit.await {
            Ok(new_id) => {
                debug!(
                    "Pending reply to post {} created as post {}",
                    reply.post_id, new_id
                );
                self.store.delete_reply(reply.post_id, reply.user_id).await?;
                best_effort(self.attachments.delete_folder(&folder)).await;
                Ok(SyncResult {
                    updated: true,
                    warnings: vec![],
                })
            }
            Err(err) if err.is_web_service_error() => {
                warn!("Server rejected pending reply to post {}: {}", reply.post_id, err);
                self.store.delete_reply(reply.post_id, reply.user_id).await?;
                best_effort(self.attachments.delete_folder(&folder)).await;
                Ok(SyncResult {
                    updated: true,
                    warnings: vec![offline_data_deleted_warning(&reply.subject, &err.to_string())],
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn discard_discussion(
        &self,
        discussion: &PendingDiscussion,
        folder: &DraftFolder,
    ) -> Result<(), AppError> {
        self.store
            .delete_discussion(discussion.forum_id, discussion.user_id, discussion.time_created)
            .await?;
        best_effort(self.attachments.delete_folder(folder)).await;
        Ok(())
    }
}

/// Merge per-action outcomes into one pass result, keeping the first hard
/// error aside so the remaining actions still got their chance first.
pub(crate) fn collect_outcomes(
    outcomes: Vec<Result<SyncResult, AppError>>,
) -> (SyncResult, Option<AppError>) {
    let mut result = SyncResult::none();
    let mut first_error = None;
    for outcome in outcomes {
        match outcome {
            Ok(partial) => result.merge(partial),
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    (result, first_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{
        MemoryActionStore, MockAttachmentStore, MockConnectivity, MockForumRemote, MockLogQueue,
        MockRatingSync, MockUploader, WriteBehavior,
    };
    use crate::domain::value_objects::{ActionOptions, AttachmentSet, AttachmentsId, FileRef};

    struct Fixture {
        service: ForumSyncService,
        store: Arc<MemoryActionStore>,
        remote: Arc<MockForumRemote>,
        connectivity: Arc<MockConnectivity>,
        attachments: Arc<MockAttachmentStore>,
        uploader: Arc<MockUploader>,
        ratings: Arc<MockRatingSync>,
    }

    fn fixture(online: bool) -> Fixture {
        let store = Arc::new(MemoryActionStore::default());
        let remote = Arc::new(MockForumRemote::default());
        let connectivity = Arc::new(MockConnectivity::new(online));
        let attachments = Arc::new(MockAttachmentStore::default());
        let uploader = Arc::new(MockUploader::default());
        let ratings = Arc::new(MockRatingSync::default());
        let service = ForumSyncService::new(
            Arc::new(SyncRegistry::new(300)),
            store.clone(),
            remote.clone(),
            connectivity.clone(),
            attachments.clone(),
            uploader.clone(),
            ratings.clone(),
            Arc::new(MockLogQueue::default()),
        );
        Fixture {
            service,
            store,
            remote,
            connectivity,
            attachments,
            uploader,
            ratings,
        }
    }

    fn pending_discussion(forum_id: i64, user_id: i64, time_created: i64) -> PendingDiscussion {
        PendingDiscussion {
            forum_id,
            name: "Course news".into(),
            course_id: 3,
            subject: "Week 4 reading".into(),
            message: "Chapters 7 and 8".into(),
            options: ActionOptions::empty(),
            group_id: -1,
            user_id,
            time_created,
        }
    }

    fn pending_reply(post_id: i64, user_id: i64) -> PendingReply {
        PendingReply {
            post_id,
            discussion_id: 40,
            forum_id: 7,
            name: "Course news".into(),
            course_id: 3,
            subject: "Re: Week 4 reading".into(),
            message: "Chapter 8 is optional".into(),
            options: ActionOptions::empty(),
            user_id,
            time_created: 500,
        }
    }

    #[tokio::test]
    async fn test_empty_queue_sync_is_idempotent() {
        let fx = fixture(true);

        let first = fx.service.sync_new_discussions(7, 2).await.unwrap();
        let second = fx.service.sync_new_discussions(7, 2).await.unwrap();

        assert!(!first.updated);
        assert_eq!(first, second);
        assert_eq!(fx.remote.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_sync_submits_and_clears_queue() {
        let fx = fixture(true);
        fx.store
            .add_discussion(pending_discussion(7, 2, 100))
            .await
            .unwrap();

        let result = fx.service.sync_new_discussions(7, 2).await.unwrap();

        assert!(result.updated);
        assert!(result.warnings.is_empty());
        assert_eq!(fx.remote.submission_count(), 1);
        assert!(fx.store.discussions.lock().unwrap().is_empty());
        let invalidated = fx.remote.invalidated.lock().unwrap();
        assert!(invalidated.contains(&"discussions:7".to_string()));
        assert!(invalidated.contains(&"can-add:7".to_string()));

        // A follow-up pass finds nothing to do.
        let again = fx.service.sync_new_discussions(7, 2).await.unwrap();
        assert!(!again.updated);
        assert_eq!(fx.remote.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_syncs_submit_once() {
        let fx = fixture(true);
        fx.store
            .add_discussion(pending_discussion(7, 2, 100))
            .await
            .unwrap();

        let first = {
            let service = fx.service.clone();
            tokio::spawn(async move { service.sync_new_discussions(7, 2).await })
        };
        let second = {
            let service = fx.service.clone();
            tokio::spawn(async move { service.sync_new_discussions(7, 2).await })
        };

        let (first, second) = (first.await.unwrap().unwrap(), second.await.unwrap().unwrap());
        assert_eq!(first, second);
        assert_eq!(fx.remote.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_server_rejection_discards_record_with_warning() {
        let fx = fixture(true);
        *fx.remote.behavior.lock().unwrap() = WriteBehavior::RejectWebService;
        fx.store
            .add_discussion(pending_discussion(7, 2, 100))
            .await
            .unwrap();

        let result = fx.service.sync_new_discussions(7, 2).await.unwrap();

        assert!(result.updated);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Week 4 reading"));
        assert!(fx.store.discussions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connectivity_failure_preserves_record() {
        let fx = fixture(true);
        *fx.remote.behavior.lock().unwrap() = WriteBehavior::FailConnectivity;
        fx.store
            .add_discussion(pending_discussion(7, 2, 100))
            .await
            .unwrap();

        let err = fx.service.sync_new_discussions(7, 2).await.unwrap_err();

        assert!(err.is_connectivity_error());
        assert_eq!(fx.store.discussions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_device_fails_fast_with_pending_work() {
        let fx = fixture(false);
        fx.store
            .add_discussion(pending_discussion(7, 2, 100))
            .await
            .unwrap();

        let err = fx.service.sync_new_discussions(7, 2).await.unwrap_err();

        assert!(err.is_connectivity_error());
        assert_eq!(fx.remote.submission_count(), 0);
        assert_eq!(fx.store.discussions.lock().unwrap().len(), 1);

        // Empty queues sync fine offline, nothing needs the network.
        fx.connectivity
            .online
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let result = fx.service.sync_new_discussions(7, 2).await.unwrap();
        assert!(result.updated);
    }

    #[tokio::test]
    async fn test_blocked_id_rejects_pass() {
        let fx = fixture(true);
        fx.store
            .add_discussion(pending_discussion(7, 2, 100))
            .await
            .unwrap();

        let id = SyncId::forum(7, 2);
        fx.service.registry().block(&id);
        let err = fx.service.sync_new_discussions(7, 2).await.unwrap_err();
        assert!(matches!(err, AppError::SyncBlocked(_)));
        assert_eq!(fx.remote.submission_count(), 0);

        fx.service.registry().unblock(&id);
        let result = fx.service.sync_new_discussions(7, 2).await.unwrap();
        assert!(result.updated);
    }

    #[tokio::test]
    async fn test_if_needed_skips_after_recent_pass() {
        let fx = fixture(true);

        let first = fx.service.sync_new_discussions_if_needed(7, 2).await.unwrap();
        assert!(first.is_some());

        let second = fx.service.sync_new_discussions_if_needed(7, 2).await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_attachments_upload_and_folder_cleanup() {
        let fx = fixture(true);

        let folder = DraftFolder::NewDiscussion {
            forum_id: 7,
            time_created: 100,
        };
        fx.attachments
            .store_file(&folder, "diagram.png", b"png")
            .await
            .unwrap();

        let mut discussion = pending_discussion(7, 2, 100);
        discussion.options.set_attachments(AttachmentsId::Staged(AttachmentSet {
            online: vec![FileRef::remote("old.pdf", "https://campus.example/old.pdf")],
            offline: true,
        }));
        fx.store.add_discussion(discussion).await.unwrap();

        let result = fx.service.sync_new_discussions(7, 2).await.unwrap();

        assert!(result.updated);
        let uploads = fx.uploader.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0.len(), 2);
        assert_eq!(uploads[0].1, FORUM_COMPONENT);
        assert_eq!(fx.attachments.deleted.lock().unwrap().as_slice(), &[folder]);
    }

    #[tokio::test]
    async fn test_rating_sync_aggregates_warnings_and_invalidates() {
        use crate::application::ports::rating_sync::{RatingItemSet, RatingSyncItemResult};

        let fx = fixture(true);
        *fx.ratings.results.lock().unwrap() = vec![
            RatingSyncItemResult {
                item_set: RatingItemSet {
                    item_set_id: 40,
                    course_id: 3,
                    instance_id: 7,
                },
                updated: vec![33],
                warnings: vec!["rating of a deleted post skipped".into()],
            },
            RatingSyncItemResult {
                item_set: RatingItemSet {
                    item_set_id: 41,
                    course_id: 3,
                    instance_id: 7,
                },
                updated: vec![],
                warnings: vec![],
            },
        ];

        let result = fx.service.sync_ratings(Some(7), None, false).await.unwrap();

        assert!(result.updated);
        assert_eq!(result.warnings.len(), 1);
        let invalidated = fx.remote.invalidated.lock().unwrap();
        assert!(invalidated.contains(&"posts:40".to_string()));
        assert!(invalidated.contains(&"discussions:7".to_string()));
        // The item set with no applied ratings left its caches alone.
        assert!(!invalidated.contains(&"posts:41".to_string()));
    }

    #[tokio::test]
    async fn test_reply_sync_invalidates_posts_cache() {
        let fx = fixture(true);
        fx.store.add_reply(pending_reply(33, 2)).await.unwrap();

        let result = fx.service.sync_discussion_replies(40, 2).await.unwrap();

        assert!(result.updated);
        assert!(fx.store.replies.lock().unwrap().is_empty());
        let invalidated = fx.remote.invalidated.lock().unwrap();
        assert!(invalidated.contains(&"posts:40".to_string()));
        assert!(invalidated.contains(&"discussions:7".to_string()));
    }

    #[tokio::test]
    async fn test_reply_rejection_cleans_draft_folder() {
        let fx = fixture(true);
        *fx.remote.behavior.lock().unwrap() = WriteBehavior::RejectWebService;
        fx.store.add_reply(pending_reply(33, 2)).await.unwrap();

        let folder = DraftFolder::Reply {
            forum_id: 7,
            post_id: 33,
            user_id: 2,
        };
        fx.attachments
            .store_file(&folder, "notes.txt", b"txt")
            .await
            .unwrap();

        let result = fx.service.sync_discussion_replies(40, 2).await.unwrap();

        assert!(result.updated);
        assert_eq!(result.warnings.len(), 1);
        assert!(fx.store.replies.lock().unwrap().is_empty());
        assert_eq!(fx.attachments.deleted.lock().unwrap().as_slice(), &[folder]);
    }
}
