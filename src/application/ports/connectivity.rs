use async_trait::async_trait;

/// Platform connectivity probe.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}
