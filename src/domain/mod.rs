pub mod constants;
pub mod entities;
pub mod value_objects;

pub use constants::{ALL_PARTICIPANTS, FORUM_COMPONENT, GLOSSARY_COMPONENT};
pub use entities::{Discussion, GlossaryEntry, MergedView, Post, SyncResult};
pub use value_objects::{ActionOptions, AttachmentSet, AttachmentsId, FileRef, SyncId};
