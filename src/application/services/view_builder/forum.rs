use crate::application::ports::action_store::ActionStore;
use crate::application::ports::cache::CacheStrategy;
use crate::application::ports::forum_remote::ForumRemote;
use crate::application::ports::profiles::ProfileLookup;
use crate::domain::entities::forum::{Discussion, DiscussionSort, Post};
use crate::domain::entities::offline::{PendingDiscussion, PendingReply};
use crate::domain::entities::view::{DiscussionItem, ItemSource, MergedView, PostItem};
use crate::shared::best_effort::{best_effort, best_effort_or};
use crate::shared::error::AppError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// Builds the merged forum views a screen renders: remote content plus the
/// user's own queued actions, as one list.
pub struct ForumViewBuilder {
    store: Arc<dyn ActionStore>,
    remote: Arc<dyn ForumRemote>,
    profiles: Arc<dyn ProfileLookup>,
}

impl Clone for ForumViewBuilder {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            remote: Arc::clone(&self.remote),
            profiles: Arc::clone(&self.profiles),
        }
    }
}

impl ForumViewBuilder {
    pub fn new(
        store: Arc<dyn ActionStore>,
        remote: Arc<dyn ForumRemote>,
        profiles: Arc<dyn ProfileLookup>,
    ) -> Self {
        Self {
            store,
            remote,
            profiles,
        }
    }

    /// Discussions of a forum with the user's queued drafts on top,
    /// newest draft first. Drafts only appear on the first page.
    ///
    /// When the remote fetch fails but drafts exist, the drafts are still
    /// returned with `fetch_failed` set; with nothing local to show, the
    /// fetch error propagates.
    pub async fn merged_discussions(
        &self,
        forum_id: i64,
        user_id: i64,
        sort: DiscussionSort,
        page: u32,
        strategy: CacheStrategy,
    ) -> Result<MergedView<DiscussionItem>, AppError> {
        let pending = if page == 0 {
            best_effort_or(self.store.discussions_for_forum(forum_id, Some(user_id)), vec![]).await
        } else {
            vec![]
        };

        let fetched = self.remote.discussions(forum_id, sort, page, strategy).await;

        let mut view = MergedView::empty();
        for draft in &pending {
            view.items
                .push(DiscussionItem::offline(self.virtual_discussion(draft).await));
        }

        match fetched {
            Ok(page_result) => {
                // Everything up to this page came in `per_page` slices; only
                // the current page can run short.
                let fetched_count = page_result.discussions.len() as u32;
                view.can_load_more = fetched_count > 0
                    && page * page_result.per_page + fetched_count < page_result.total;
                view.items.extend(
                    page_result
                        .discussions
                        .into_iter()
                        .map(DiscussionItem::online),
                );
            }
            Err(err) if !view.items.is_empty() => {
                warn!("Discussion fetch for forum {} failed: {}", forum_id, err);
                view.fetch_failed = true;
            }
            Err(err) => return Err(err),
        }

        Ok(view)
    }

    /// Threaded posts of a discussion, children after their parent in
    /// creation order, with the user's queued replies spliced in as virtual
    /// posts. A post with a queued reply against it gets `can_reply` cleared.
    pub async fn merged_posts(
        &self,
        discussion_id: i64,
        user_id: i64,
        strategy: CacheStrategy,
    ) -> Result<MergedView<PostItem>, AppError> {
        let pending = best_effort_or(
            self.store.replies_for_discussion(discussion_id, Some(user_id)),
            vec![],
        )
        .await;

        let posts = match self.remote.discussion_posts(discussion_id, strategy).await {
            Ok(posts) => posts,
            Err(err) if !pending.is_empty() => {
                warn!("Post fetch for discussion {} failed: {}", discussion_id, err);
                let mut view = MergedView::empty();
                view.fetch_failed = true;
                for reply in &pending {
                    view.items.push(PostItem {
                        source: ItemSource::Offline,
                        post: self.virtual_reply(reply).await,
                        can_reply: false,
                    });
                }
                return Ok(view);
            }
            Err(err) => return Err(err),
        };

        let replied_to: HashSet<i64> = pending.iter().map(|r| r.post_id).collect();

        // Children per parent, merged with virtual replies, creation order.
        let mut children: HashMap<Option<i64>, Vec<PostItem>> = HashMap::new();
        for post in posts {
            let parent = post.parent_id;
            let can_reply = !replied_to.contains(&post.id);
            children.entry(parent).or_default().push(PostItem {
                source: ItemSource::Online,
                post,
                can_reply,
            });
        }
        for reply in &pending {
            children
                .entry(Some(reply.post_id))
                .or_default()
                .push(PostItem {
                    source: ItemSource::Offline,
                    post: self.virtual_reply(reply).await,
                    can_reply: false,
                });
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|item| (item.post.time_created, item.post.id));
        }

        // Depth-first walk from the opening post keeps every subtree
        // contiguous below its parent.
        let mut view = MergedView::empty();
        let mut stack: Vec<PostItem> = children.remove(&None).unwrap_or_default();
        stack.reverse();
        while let Some(item) = stack.pop() {
            if let Some(mut replies) = children.remove(&Some(item.post.id)) {
                replies.reverse();
                stack.extend(replies);
            }
            view.items.push(item);
        }

        // Orphans whose parent was not fetched still show up at the end.
        let mut leftovers: Vec<PostItem> =
            children.into_values().flatten().collect();
        leftovers.sort_by_key(|item| (item.post.time_created, item.post.id));
        view.items.extend(leftovers);

        Ok(view)
    }

    /// A queued draft rendered as a discussion. The negative id keeps it
    /// apart from every remote discussion.
    async fn virtual_discussion(&self, draft: &PendingDiscussion) -> Discussion {
        let profile = best_effort(self.profiles.profile(draft.user_id)).await;
        Discussion {
            id: -draft.time_created,
            forum_id: draft.forum_id,
            subject: draft.subject.clone(),
            message: draft.message.clone(),
            group_id: draft.group_id,
            user_id: draft.user_id,
            user_full_name: profile.as_ref().map(|p| p.full_name.clone()),
            user_picture_url: profile.and_then(|p| p.picture_url),
            time_created: draft.time_created,
            pinned: false,
            num_replies: 0,
        }
    }

    async fn virtual_reply(&self, reply: &PendingReply) -> Post {
        let profile = best_effort(self.profiles.profile(reply.user_id)).await;
        Post {
            id: -reply.time_created,
            discussion_id: reply.discussion_id,
            parent_id: Some(reply.post_id),
            subject: reply.subject.clone(),
            message: reply.message.clone(),
            user_id: reply.user_id,
            user_full_name: profile.as_ref().map(|p| p.full_name.clone()),
            user_picture_url: profile.and_then(|p| p.picture_url),
            time_created: reply.time_created,
        }
    }
}
