use crate::shared::error::AppError;
use std::future::Future;
use tracing::debug;

/// Await an operation whose failure must not interrupt the caller.
///
/// Non-critical steps of a sync pass (log replay, cache invalidation,
/// profile enrichment) go through here so that "ignore and continue" is an
/// explicit, reviewable operation rather than a silently dropped error.
pub async fn best_effort<T, F>(operation: F) -> Option<T>
where
    F: Future<Output = Result<T, AppError>>,
{
    match operation.await {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("Ignoring non-critical failure: {}", err);
            None
        }
    }
}

/// Same as [`best_effort`] but substitutes a default value on failure.
pub async fn best_effort_or<T, F>(operation: F, default: T) -> T
where
    F: Future<Output = Result<T, AppError>>,
{
    best_effort(operation).await.unwrap_or(default)
}
