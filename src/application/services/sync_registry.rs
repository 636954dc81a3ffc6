use crate::domain::entities::offline::SyncResult;
use crate::domain::value_objects::SyncId;
use crate::shared::error::AppError;
use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;
use tracing::debug;

type SharedSync = Shared<BoxFuture<'static, Result<SyncResult, AppError>>>;

/// Per-`SyncId` coordination state shared by all sync services.
///
/// Guarantees at most one sync pass in flight per id: a second caller for
/// the same id receives the in-flight pass's shared future and therefore an
/// equal result, never a duplicate network submission. A separate blocked
/// set lets foreground edit UIs pre-empt new passes entirely, and last-sync
/// times gate the `*_if_needed` variants.
///
/// All maps sit behind plain mutexes that are only held across synchronous
/// sections, never across an await point.
pub struct SyncRegistry {
    ongoing: Mutex<HashMap<SyncId, SharedSync>>,
    blocked: Mutex<HashSet<SyncId>>,
    last_sync: Mutex<HashMap<SyncId, DateTime<Utc>>>,
    min_sync_interval: Duration,
}

impl SyncRegistry {
    pub fn new(min_sync_interval_secs: u64) -> Self {
        Self {
            ongoing: Mutex::new(HashMap::new()),
            blocked: Mutex::new(HashSet::new()),
            last_sync: Mutex::new(HashMap::new()),
            min_sync_interval: Duration::seconds(min_sync_interval_secs as i64),
        }
    }

    /// Run `operation` as the single sync pass for `sync_id`.
    ///
    /// If a pass is already running for the id, its future is joined
    /// instead and `operation` is dropped unexecuted. If the id is blocked
    /// and no pass is running, fails with [`AppError::SyncBlocked`] without
    /// touching any state.
    pub async fn run<F>(&self, sync_id: SyncId, operation: F) -> Result<SyncResult, AppError>
    where
        F: Future<Output = Result<SyncResult, AppError>> + Send + 'static,
    {
        let (shared, owner) = {
            let mut ongoing = self.ongoing.lock().expect("sync registry poisoned");

            if let Some(existing) = ongoing.get(&sync_id) {
                debug!("Sync already in progress for {}, joining it", sync_id);
                (existing.clone(), false)
            } else {
                if self.is_blocked(&sync_id) {
                    debug!("Cannot sync {} because it is blocked", sync_id);
                    return Err(AppError::SyncBlocked(format!(
                        "{sync_id} is blocked by an ongoing operation"
                    )));
                }

                let shared = operation.boxed().shared();
                ongoing.insert(sync_id.clone(), shared.clone());
                (shared, true)
            }
        };

        let result = shared.await;

        if owner {
            self.ongoing
                .lock()
                .expect("sync registry poisoned")
                .remove(&sync_id);
        }

        result
    }

    pub fn is_syncing(&self, sync_id: &SyncId) -> bool {
        self.ongoing
            .lock()
            .expect("sync registry poisoned")
            .contains_key(sync_id)
    }

    /// Prevent new sync passes for the id until [`unblock`](Self::unblock)
    /// is called. The caller owns clearing the flag on every exit path.
    pub fn block(&self, sync_id: &SyncId) {
        self.blocked
            .lock()
            .expect("sync registry poisoned")
            .insert(sync_id.clone());
    }

    pub fn unblock(&self, sync_id: &SyncId) {
        self.blocked
            .lock()
            .expect("sync registry poisoned")
            .remove(sync_id);
    }

    pub fn is_blocked(&self, sync_id: &SyncId) -> bool {
        self.blocked
            .lock()
            .expect("sync registry poisoned")
            .contains(sync_id)
    }

    /// Whether enough time has passed since the last recorded pass for a
    /// non-forced sync to be worthwhile.
    pub fn is_sync_needed(&self, sync_id: &SyncId) -> bool {
        let last_sync = self.last_sync.lock().expect("sync registry poisoned");
        match last_sync.get(sync_id) {
            Some(time) => Utc::now() - *time >= self.min_sync_interval,
            None => true,
        }
    }

    pub fn set_sync_time(&self, sync_id: &SyncId) {
        self.last_sync
            .lock()
            .expect("sync registry poisoned")
            .insert(sync_id.clone(), Utc::now());
    }
}
