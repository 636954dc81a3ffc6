use crate::domain::value_objects::FileRef;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Staging folder of one draft's offline attachments.
///
/// The layout mirrors the draft identities: creation drafts are keyed by
/// parent id and creation time, replies by post and user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftFolder {
    NewDiscussion { forum_id: i64, time_created: i64 },
    Reply { forum_id: i64, post_id: i64, user_id: i64 },
    NewEntry { glossary_id: i64, time_created: i64 },
}

impl DraftFolder {
    /// Path of the folder relative to the attachment storage root.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            DraftFolder::NewDiscussion {
                forum_id,
                time_created,
            } => PathBuf::from(format!("offlineforum/{forum_id}/newdisc_{time_created}")),
            DraftFolder::Reply {
                forum_id,
                post_id,
                user_id,
            } => PathBuf::from(format!("offlineforum/{forum_id}/reply_{post_id}_{user_id}")),
            DraftFolder::NewEntry {
                glossary_id,
                time_created,
            } => PathBuf::from(format!(
                "offlineglossary/{glossary_id}/newentry_{time_created}"
            )),
        }
    }
}

/// Local blob store for staged attachments, keyed by draft folder.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn store_file(
        &self,
        folder: &DraftFolder,
        filename: &str,
        data: &[u8],
    ) -> Result<(), AppError>;

    /// Files currently staged in the folder. A missing folder is an error;
    /// callers that treat it as "no files" go through `best_effort`.
    async fn list_folder(&self, folder: &DraftFolder) -> Result<Vec<FileRef>, AppError>;

    /// Remove the folder and everything in it. No-op if absent.
    async fn delete_folder(&self, folder: &DraftFolder) -> Result<(), AppError>;
}

/// Upload collaborator: pushes a mixed set of local and already-online
/// files into a server draft area and returns its item id.
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload_or_reupload(
        &self,
        files: &[FileRef],
        component: &str,
        item_id: i64,
    ) -> Result<i64, AppError>;
}
