use crate::application::ports::cache::CacheStrategy;
use crate::application::ports::forum_remote::ForumRemote;
use crate::application::ports::transport::WsTransport;
use crate::domain::entities::forum::{Discussion, DiscussionSort, DiscussionsPage, Post};
use crate::domain::value_objects::ActionOptions;
use crate::infrastructure::cache::MemoryCache;
use crate::infrastructure::remote::{parse_response, read_with_strategy};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const PAGE_SIZE: u32 = 10;

/// [`ForumRemote`] backed by the web service transport plus a TTL cache
/// for reads.
pub struct ForumWsClient {
    transport: Arc<dyn WsTransport>,
    cache: Arc<MemoryCache<Value>>,
}

impl ForumWsClient {
    pub fn new(transport: Arc<dyn WsTransport>, cache: Arc<MemoryCache<Value>>) -> Self {
        Self { transport, cache }
    }

    fn discussions_key(forum_id: i64, sort: DiscussionSort, page: u32) -> String {
        format!("forum:{forum_id}:discussions:{}:{page}", sort.as_str())
    }

    fn posts_key(discussion_id: i64) -> String {
        format!("discussion:{discussion_id}:posts")
    }

    fn can_add_key(forum_id: i64) -> String {
        format!("forum:{forum_id}:canadd")
    }
}

#[derive(Deserialize)]
struct DiscussionsResponse {
    discussions: Vec<WireDiscussion>,
    #[serde(default)]
    totalcount: u32,
}

#[derive(Deserialize)]
struct WireDiscussion {
    discussion: i64,
    forum: i64,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    groupid: i64,
    userid: i64,
    #[serde(default)]
    userfullname: Option<String>,
    #[serde(default)]
    userpictureurl: Option<String>,
    created: i64,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    numreplies: u32,
}

impl From<WireDiscussion> for Discussion {
    fn from(wire: WireDiscussion) -> Self {
        Discussion {
            id: wire.discussion,
            forum_id: wire.forum,
            subject: wire.subject,
            message: wire.message,
            group_id: wire.groupid,
            user_id: wire.userid,
            user_full_name: wire.userfullname,
            user_picture_url: wire.userpictureurl,
            time_created: wire.created,
            pinned: wire.pinned,
            num_replies: wire.numreplies,
        }
    }
}

#[derive(Deserialize)]
struct PostsResponse {
    posts: Vec<WirePost>,
}

#[derive(Deserialize)]
struct WirePost {
    id: i64,
    discussionid: i64,
    #[serde(default)]
    parentid: Option<i64>,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
    userid: i64,
    #[serde(default)]
    userfullname: Option<String>,
    #[serde(default)]
    userpictureurl: Option<String>,
    created: i64,
}

impl From<WirePost> for Post {
    fn from(wire: WirePost) -> Self {
        Post {
            id: wire.id,
            discussion_id: wire.discussionid,
            parent_id: wire.parentid,
            subject: wire.subject,
            message: wire.message,
            user_id: wire.userid,
            user_full_name: wire.userfullname,
            user_picture_url: wire.userpictureurl,
            time_created: wire.created,
        }
    }
}

#[derive(Deserialize)]
struct CanAddResponse {
    status: bool,
}

#[derive(Deserialize)]
struct AddDiscussionResponse {
    discussionid: i64,
}

#[derive(Deserialize)]
struct AddPostResponse {
    postid: i64,
}

#[async_trait]
impl ForumRemote for ForumWsClient {
    async fn discussions(
        &self,
        forum_id: i64,
        sort: DiscussionSort,
        page: u32,
        strategy: CacheStrategy,
    ) -> Result<DiscussionsPage, AppError> {
        let response = read_with_strategy(
            self.transport.as_ref(),
            &self.cache,
            strategy,
            &Self::discussions_key(forum_id, sort, page),
            "mod_forum_get_forum_discussions",
            json!({
                "forumid": forum_id,
                "sortorder": sort.as_str(),
                "page": page,
                "perpage": PAGE_SIZE,
            }),
        )
        .await?;

        let parsed: DiscussionsResponse = parse_response(response, "discussions")?;
        Ok(DiscussionsPage {
            discussions: parsed.discussions.into_iter().map(Discussion::from).collect(),
            per_page: PAGE_SIZE,
            total: parsed.totalcount,
        })
    }

    async fn discussion_posts(
        &self,
        discussion_id: i64,
        strategy: CacheStrategy,
    ) -> Result<Vec<Post>, AppError> {
        let response = read_with_strategy(
            self.transport.as_ref(),
            &self.cache,
            strategy,
            &Self::posts_key(discussion_id),
            "mod_forum_get_discussion_posts",
            json!({ "discussionid": discussion_id }),
        )
        .await?;

        let parsed: PostsResponse = parse_response(response, "discussion posts")?;
        Ok(parsed.posts.into_iter().map(Post::from).collect())
    }

    async fn can_add_discussion(
        &self,
        forum_id: i64,
        strategy: CacheStrategy,
    ) -> Result<bool, AppError> {
        let response = read_with_strategy(
            self.transport.as_ref(),
            &self.cache,
            strategy,
            &Self::can_add_key(forum_id),
            "mod_forum_can_add_discussion",
            json!({ "forumid": forum_id }),
        )
        .await?;

        let parsed: CanAddResponse = parse_response(response, "can add discussion")?;
        Ok(parsed.status)
    }

    async fn add_discussion(
        &self,
        forum_id: i64,
        subject: &str,
        message: &str,
        options: &ActionOptions,
        group_id: i64,
    ) -> Result<i64, AppError> {
        let response = self
            .transport
            .write(
                "mod_forum_add_discussion",
                json!({
                    "forumid": forum_id,
                    "subject": subject,
                    "message": message,
                    "groupid": group_id,
                    "options": options.as_json(),
                }),
            )
            .await?;

        let parsed: AddDiscussionResponse = parse_response(response, "add discussion")?;
        Ok(parsed.discussionid)
    }

    async fn reply_post(
        &self,
        post_id: i64,
        subject: &str,
        message: &str,
        options: &ActionOptions,
    ) -> Result<i64, AppError> {
        let response = self
            .transport
            .write(
                "mod_forum_add_discussion_post",
                json!({
                    "postid": post_id,
                    "subject": subject,
                    "message": message,
                    "options": options.as_json(),
                }),
            )
            .await?;

        let parsed: AddPostResponse = parse_response(response, "reply post")?;
        Ok(parsed.postid)
    }

    async fn invalidate_discussions_list(&self, forum_id: i64) -> Result<(), AppError> {
        self.cache
            .delete_pattern(&format!("forum:{forum_id}:discussions"))
            .await;
        Ok(())
    }

    async fn invalidate_can_add_discussion(&self, forum_id: i64) -> Result<(), AppError> {
        self.cache.delete(&Self::can_add_key(forum_id)).await;
        Ok(())
    }

    async fn invalidate_discussion_posts(&self, discussion_id: i64) -> Result<(), AppError> {
        self.cache.delete(&Self::posts_key(discussion_id)).await;
        Ok(())
    }
}
