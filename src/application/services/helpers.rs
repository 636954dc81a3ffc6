use crate::application::ports::attachments::{AttachmentStore, DraftFolder, FileUploader};
use crate::domain::value_objects::{ActionOptions, AttachmentsId};
use crate::shared::best_effort::best_effort;
use crate::shared::error::AppError;

/// Warning surfaced to the user when a pending action had to be discarded
/// because the server permanently rejected it.
pub fn offline_data_deleted_warning(item_name: &str, reason: &str) -> String {
    format!("'{item_name}' could not be sent to the server and has been discarded. {reason}")
}

/// Upload the attachments of a pending action, if it has any.
///
/// Already-online files are re-used; files staged in the draft's folder are
/// read and uploaded alongside them (a missing folder simply means nothing
/// extra to upload). Returns the draft area item id to submit with the
/// action, or `None` when the action carries no attachments.
pub async fn upload_attachments(
    attachments: &dyn AttachmentStore,
    uploader: &dyn FileUploader,
    folder: &DraftFolder,
    options: &ActionOptions,
    component: &str,
    item_id: i64,
) -> Result<Option<i64>, AppError> {
    let Some(descriptor) = options.attachments() else {
        return Ok(None);
    };

    match descriptor {
        // A previous attempt already pushed the files into a draft area.
        AttachmentsId::DraftItemId(draft_id) => Ok(Some(draft_id)),
        AttachmentsId::Staged(set) => {
            let mut files = set.online.clone();
            if set.offline {
                if let Some(staged) = best_effort(attachments.list_folder(folder)).await {
                    files.extend(staged);
                }
            }

            if files.is_empty() {
                return Ok(None);
            }

            uploader
                .upload_or_reupload(&files, component, item_id)
                .await
                .map(Some)
        }
    }
}
