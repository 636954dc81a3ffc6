use crate::application::ports::action_store::ActionStore;
use crate::domain::entities::offline::{PendingDiscussion, PendingEntry, PendingReply};
use crate::domain::value_objects::ActionOptions;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::{FromRow, Pool, Sqlite};

/// SQLite-backed pending-action store.
///
/// One table per record kind, each with the kind's composite identity as
/// its primary key; a colliding insert surfaces as
/// [`AppError::DuplicateKey`] through the sqlx error mapping. Options are
/// stored as a JSON text column and round-trip untouched.
pub struct SqliteActionStore {
    pool: Pool<Sqlite>,
}

impl SqliteActionStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS offline_discussions (
                forum_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                course_id INTEGER NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                options TEXT NOT NULL,
                group_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                time_created INTEGER NOT NULL,
                PRIMARY KEY (forum_id, user_id, time_created)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS offline_replies (
                post_id INTEGER NOT NULL,
                discussion_id INTEGER NOT NULL,
                forum_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                course_id INTEGER NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                options TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                time_created INTEGER NOT NULL,
                PRIMARY KEY (post_id, user_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS offline_entries (
                glossary_id INTEGER NOT NULL,
                course_id INTEGER NOT NULL,
                concept TEXT NOT NULL,
                definition TEXT NOT NULL,
                options TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                time_created INTEGER NOT NULL,
                PRIMARY KEY (glossary_id, user_id, time_created)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(FromRow)]
struct DiscussionRow {
    forum_id: i64,
    name: String,
    course_id: i64,
    subject: String,
    message: String,
    options: String,
    group_id: i64,
    user_id: i64,
    time_created: i64,
}

impl DiscussionRow {
    fn into_entity(self) -> Result<PendingDiscussion, AppError> {
        Ok(PendingDiscussion {
            forum_id: self.forum_id,
            name: self.name,
            course_id: self.course_id,
            subject: self.subject,
            message: self.message,
            options: parse_options(&self.options)?,
            group_id: self.group_id,
            user_id: self.user_id,
            time_created: self.time_created,
        })
    }
}

#[derive(FromRow)]
struct ReplyRow {
    post_id: i64,
    discussion_id: i64,
    forum_id: i64,
    name: String,
    course_id: i64,
    subject: String,
    message: String,
    options: String,
    user_id: i64,
    time_created: i64,
}

impl ReplyRow {
    fn into_entity(self) -> Result<PendingReply, AppError> {
        Ok(PendingReply {
            post_id: self.post_id,
            discussion_id: self.discussion_id,
            forum_id: self.forum_id,
            name: self.name,
            course_id: self.course_id,
            subject: self.subject,
            message: self.message,
            options: parse_options(&self.options)?,
            user_id: self.user_id,
            time_created: self.time_created,
        })
    }
}

#[derive(FromRow)]
struct EntryRow {
    glossary_id: i64,
    course_id: i64,
    concept: String,
    definition: String,
    options: String,
    user_id: i64,
    time_created: i64,
}

impl EntryRow {
    fn into_entity(self) -> Result<PendingEntry, AppError> {
        Ok(PendingEntry {
            glossary_id: self.glossary_id,
            course_id: self.course_id,
            concept: self.concept,
            definition: self.definition,
            options: parse_options(&self.options)?,
            user_id: self.user_id,
            time_created: self.time_created,
        })
    }
}

fn parse_options(json: &str) -> Result<ActionOptions, AppError> {
    ActionOptions::from_json_str(json).map_err(AppError::SerializationError)
}

fn serialize_options(options: &ActionOptions) -> Result<String, AppError> {
    serde_json::to_string(options.as_json()).map_err(AppError::from)
}

fn collect<R, T>(rows: Vec<R>, convert: fn(R) -> Result<T, AppError>) -> Result<Vec<T>, AppError> {
    rows.into_iter().map(convert).collect()
}

#[async_trait]
impl ActionStore for SqliteActionStore {
    async fn add_discussion(&self, discussion: PendingDiscussion) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO offline_discussions (
                forum_id, name, course_id, subject, message,
                options, group_id, user_id, time_created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(discussion.forum_id)
        .bind(&discussion.name)
        .bind(discussion.course_id)
        .bind(&discussion.subject)
        .bind(&discussion.message)
        .bind(serialize_options(&discussion.options)?)
        .bind(discussion.group_id)
        .bind(discussion.user_id)
        .bind(discussion.time_created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_discussion(
        &self,
        forum_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            "DELETE FROM offline_discussions WHERE forum_id = ?1 AND user_id = ?2 AND time_created = ?3",
        )
        .bind(forum_id)
        .bind(user_id)
        .bind(time_created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn discussions_for_forum(
        &self,
        forum_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingDiscussion>, AppError> {
        let rows = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, DiscussionRow>(
                    r#"
                    SELECT * FROM offline_discussions
                    WHERE forum_id = ?1 AND user_id = ?2
                    ORDER BY time_created DESC
                    "#,
                )
                .bind(forum_id)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DiscussionRow>(
                    "SELECT * FROM offline_discussions WHERE forum_id = ?1 ORDER BY time_created DESC",
                )
                .bind(forum_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        collect(rows, DiscussionRow::into_entity)
    }

    async fn all_discussions(&self) -> Result<Vec<PendingDiscussion>, AppError> {
        let rows = sqlx::query_as::<_, DiscussionRow>(
            "SELECT * FROM offline_discussions ORDER BY time_created DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        collect(rows, DiscussionRow::into_entity)
    }

    async fn add_reply(&self, reply: PendingReply) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO offline_replies (
                post_id, discussion_id, forum_id, name, course_id,
                subject, message, options, user_id, time_created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(reply.post_id)
        .bind(reply.discussion_id)
        .bind(reply.forum_id)
        .bind(&reply.name)
        .bind(reply.course_id)
        .bind(&reply.subject)
        .bind(&reply.message)
        .bind(serialize_options(&reply.options)?)
        .bind(reply.user_id)
        .bind(reply.time_created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_reply(&self, post_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM offline_replies WHERE post_id = ?1 AND user_id = ?2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn replies_for_discussion(
        &self,
        discussion_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingReply>, AppError> {
        let rows = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, ReplyRow>(
                    r#"
                    SELECT * FROM offline_replies
                    WHERE discussion_id = ?1 AND user_id = ?2
                    ORDER BY time_created ASC
                    "#,
                )
                .bind(discussion_id)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ReplyRow>(
                    "SELECT * FROM offline_replies WHERE discussion_id = ?1 ORDER BY time_created ASC",
                )
                .bind(discussion_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        collect(rows, ReplyRow::into_entity)
    }

    async fn replies_for_forum(
        &self,
        forum_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingReply>, AppError> {
        let rows = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, ReplyRow>(
                    r#"
                    SELECT * FROM offline_replies
                    WHERE forum_id = ?1 AND user_id = ?2
                    ORDER BY time_created ASC
                    "#,
                )
                .bind(forum_id)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ReplyRow>(
                    "SELECT * FROM offline_replies WHERE forum_id = ?1 ORDER BY time_created ASC",
                )
                .bind(forum_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        collect(rows, ReplyRow::into_entity)
    }

    async fn all_replies(&self) -> Result<Vec<PendingReply>, AppError> {
        let rows =
            sqlx::query_as::<_, ReplyRow>("SELECT * FROM offline_replies ORDER BY time_created ASC")
                .fetch_all(&self.pool)
                .await?;

        collect(rows, ReplyRow::into_entity)
    }

    async fn add_entry(&self, entry: PendingEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO offline_entries (
                glossary_id, course_id, concept, definition,
                options, user_id, time_created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(entry.glossary_id)
        .bind(entry.course_id)
        .bind(&entry.concept)
        .bind(&entry.definition)
        .bind(serialize_options(&entry.options)?)
        .bind(entry.user_id)
        .bind(entry.time_created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_entry(
        &self,
        glossary_id: i64,
        user_id: i64,
        time_created: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            "DELETE FROM offline_entries WHERE glossary_id = ?1 AND user_id = ?2 AND time_created = ?3",
        )
        .bind(glossary_id)
        .bind(user_id)
        .bind(time_created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn entries_for_glossary(
        &self,
        glossary_id: i64,
        user_id: Option<i64>,
    ) -> Result<Vec<PendingEntry>, AppError> {
        let rows = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, EntryRow>(
                    r#"
                    SELECT * FROM offline_entries
                    WHERE glossary_id = ?1 AND user_id = ?2
                    ORDER BY time_created DESC
                    "#,
                )
                .bind(glossary_id)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, EntryRow>(
                    "SELECT * FROM offline_entries WHERE glossary_id = ?1 ORDER BY time_created DESC",
                )
                .bind(glossary_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        collect(rows, EntryRow::into_entity)
    }

    async fn all_entries(&self) -> Result<Vec<PendingEntry>, AppError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            "SELECT * FROM offline_entries ORDER BY time_created DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        collect(rows, EntryRow::into_entity)
    }
}
