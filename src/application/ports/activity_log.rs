use crate::shared::error::AppError;
use async_trait::async_trait;

/// Queue of view/analytics log entries recorded offline. Replayed on a
/// best-effort basis at the start of a sync pass; failures never abort the
/// pass.
#[async_trait]
pub trait ActivityLogQueue: Send + Sync {
    async fn replay(&self, component: &str, instance_id: i64) -> Result<(), AppError>;
}
