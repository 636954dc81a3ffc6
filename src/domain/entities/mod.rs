pub mod forum;
pub mod glossary;
pub mod offline;
pub mod view;

pub use forum::{Discussion, DiscussionSort, DiscussionsPage, Post};
pub use glossary::{DateOrder, EntriesPage, EntryFetchMode, GlossaryEntry};
pub use offline::{PendingDiscussion, PendingEntry, PendingReply, SyncResult};
pub use view::{DiscussionItem, EntryItem, ItemSource, MergedView, PostItem};
