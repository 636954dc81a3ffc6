pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::cache::CacheStrategy;
pub use application::services::{
    ForumOfflineService, ForumSyncService, ForumViewBuilder, GlossaryOfflineService,
    GlossarySyncService, GlossaryViewBuilder, SyncRegistry, SyncScheduler,
};
pub use domain::entities::offline::SyncResult;
pub use domain::value_objects::SyncId;
pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};

/// Install the global tracing subscriber. Call once at startup; the
/// `RUST_LOG` environment variable overrides the default filter.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_sync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
