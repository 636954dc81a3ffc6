pub mod pending_discussion;
pub mod pending_entry;
pub mod pending_reply;
pub mod sync_result;

pub use pending_discussion::PendingDiscussion;
pub use pending_entry::PendingEntry;
pub use pending_reply::PendingReply;
pub use sync_result::SyncResult;
