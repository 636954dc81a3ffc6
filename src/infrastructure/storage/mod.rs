pub mod attachment_store;

pub use attachment_store::FsAttachmentStore;
