pub mod forum_client;
pub mod glossary_client;

pub use forum_client::ForumWsClient;
pub use glossary_client::GlossaryWsClient;

use crate::application::ports::cache::CacheStrategy;
use crate::application::ports::transport::WsTransport;
use crate::infrastructure::cache::MemoryCache;
use crate::shared::error::AppError;
use serde_json::Value;
use tracing::debug;

/// Run one cached read against the transport under the requested strategy.
/// Every successful network response is written back to the cache so later
/// cache-first reads and offline fallbacks can serve it.
pub(crate) async fn read_with_strategy(
    transport: &dyn WsTransport,
    cache: &MemoryCache<Value>,
    strategy: CacheStrategy,
    key: &str,
    ws_function: &str,
    params: Value,
) -> Result<Value, AppError> {
    match strategy {
        CacheStrategy::OnlyCache => cache
            .get(key)
            .await
            .ok_or_else(|| AppError::NotFound(format!("no cached response for {key}"))),
        CacheStrategy::PreferCache => {
            if let Some(cached) = cache.get(key).await {
                return Ok(cached);
            }
            let response = transport.read(ws_function, params).await?;
            cache.set(key.to_string(), response.clone()).await;
            Ok(response)
        }
        CacheStrategy::OnlyNetwork => {
            let response = transport.read(ws_function, params).await?;
            cache.set(key.to_string(), response.clone()).await;
            Ok(response)
        }
        CacheStrategy::NetworkWithCacheFallback => {
            match transport.read(ws_function, params).await {
                Ok(response) => {
                    cache.set(key.to_string(), response.clone()).await;
                    Ok(response)
                }
                Err(err) => {
                    if let Some(cached) = cache.get(key).await {
                        debug!("Serving {} from cache after fetch failure: {}", key, err);
                        return Ok(cached);
                    }
                    Err(err.into())
                }
            }
        }
    }
}

pub(crate) fn parse_response<T: serde::de::DeserializeOwned>(
    value: Value,
    what: &str,
) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Transport(format!("malformed {what} response: {e}")))
}
