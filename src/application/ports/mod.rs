pub mod action_store;
pub mod activity_log;
pub mod attachments;
pub mod cache;
pub mod connectivity;
pub mod event_bus;
pub mod forum_remote;
pub mod glossary_remote;
pub mod profiles;
pub mod rating_sync;
pub mod transport;

pub use action_store::ActionStore;
pub use activity_log::ActivityLogQueue;
pub use attachments::{AttachmentStore, DraftFolder, FileUploader};
pub use cache::CacheStrategy;
pub use connectivity::ConnectivityProbe;
pub use event_bus::{EventBus, SyncEvent};
pub use forum_remote::ForumRemote;
pub use glossary_remote::GlossaryRemote;
pub use profiles::{ProfileLookup, UserProfile};
pub use rating_sync::{RatingItemSet, RatingSync, RatingSyncItemResult};
pub use transport::{WsError, WsTransport};
