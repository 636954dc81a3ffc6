pub mod attachments;
pub mod options;
pub mod sync_id;

pub use attachments::{AttachmentSet, AttachmentsId, FileRef};
pub use options::{ActionOptions, ATTACHMENTS_OPTION};
pub use sync_id::SyncId;
