use crate::application::ports::action_store::ActionStore;
use crate::application::ports::attachments::{AttachmentStore, DraftFolder};
use crate::domain::entities::offline::{PendingDiscussion, PendingReply};
use crate::shared::best_effort::best_effort;
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Queues forum actions locally for a later sync pass.
///
/// Attachments staged for an action live in its draft folder
/// ([`DraftFolder`] gives the layout); discarding an action removes both
/// the record and the folder.
pub struct ForumOfflineService {
    store: Arc<dyn ActionStore>,
    attachments: Arc<dyn AttachmentStore>,
}

impl Clone for ForumOfflineService {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            attachments: Arc::clone(&self.attachments),
        }
    }
}

impl ForumOfflineService {
    pub fn new(store: Arc<dyn ActionStore>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self { store, attachments }
    }

    /// Save a new discussion draft. A zero `time_created` is stamped with
    /// the current time; a non-zero one means "replace this existing draft"
    /// and deletes the old record first so the identity stays free.
    pub async fn queue_new_discussion(
        &self,
        mut discussion: PendingDiscussion,
    ) -> Result<PendingDiscussion, AppError> {
        if discussion.time_created == 0 {
            discussion.time_created = Utc::now().timestamp_millis();
        } else {
            self.store
                .delete_discussion(
                    discussion.forum_id,
                    discussion.user_id,
                    discussion.time_created,
                )
                .await?;
        }

        debug!(
            "Queueing discussion '{}' for forum {}",
            discussion.subject, discussion.forum_id
        );
        self.store.add_discussion(discussion.clone()).await?;
        Ok(discussion)
    }

    /// Save a reply draft. Fails with [`AppError::DuplicateKey`] when the
    /// user already holds a pending reply to the same post.
    pub async fn queue_reply(&self, mut reply: PendingReply) -> Result<PendingReply, AppError> {
        if reply.time_created == 0 {
            reply.time_created = Utc::now().timestamp_millis();
        }

        debug!("Queueing reply to post {}", reply.post_id);
        self.store.add_reply(reply.clone()).await?;
        Ok(reply)
    }

    /// Overwrite an existing reply draft for the same post.
    pub async fn replace_reply(&self, reply: PendingReply) -> Result<PendingReply, AppError> {
        self.store.delete_reply(reply.post_id, reply.user_id).await?;
        self.queue_reply(reply).await
    }

    /// Drop a discussion draft and its staged attachments.
    pub async fn discard_new_discussion(
        &self,
        forum_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError> {
        self.store
            .delete_discussion(forum_id, user_id, time_created)
            .await?;
        best_effort(self.attachments.delete_folder(&DraftFolder::NewDiscussion {
            forum_id,
            time_created,
        }))
        .await;
        Ok(())
    }

    /// Drop a reply draft and its staged attachments.
    pub async fn discard_reply(
        &self,
        forum_id: i64,
        post_id: i64,
        user_id: i64,
    ) -> Result<(), AppError> {
        self.store.delete_reply(post_id, user_id).await?;
        best_effort(self.attachments.delete_folder(&DraftFolder::Reply {
            forum_id,
            post_id,
            user_id,
        }))
        .await;
        Ok(())
    }

    /// Whether the user already replied to `post_id` offline. Used by view
    /// builders to disable the reply affordance on such posts.
    pub async fn has_pending_reply(&self, post_id: i64, user_id: i64) -> Result<bool, AppError> {
        let replies = self.store.all_replies().await?;
        Ok(replies
            .iter()
            .any(|r| r.post_id == post_id && r.user_id == user_id))
    }
}
