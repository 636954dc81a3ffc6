use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Wire-level failure of a web service call.
///
/// The `WebService` / `Connectivity` split is load-bearing: it decides
/// whether a failed offline action is discarded with a warning or kept for
/// a later retry.
#[derive(Debug, Clone, Error)]
pub enum WsError {
    /// The server processed the request and rejected it.
    #[error("web service rejected the request ({code}): {message}")]
    WebService { code: String, message: String },
    /// The server could not be reached (offline, DNS failure, timeout).
    #[error("could not reach the server: {0}")]
    Connectivity(String),
    /// The server answered with something the client cannot interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<WsError> for AppError {
    fn from(err: WsError) -> Self {
        match err {
            WsError::WebService { code, message } => {
                AppError::WebService(format!("{code}: {message}"))
            }
            WsError::Connectivity(msg) => AppError::Connectivity(msg),
            WsError::InvalidResponse(msg) => AppError::Transport(msg),
        }
    }
}

/// Transport to the backend API. The HTTP/JSON plumbing, auth headers and
/// retry-on-401 live behind this trait and are out of scope for the sync
/// engine; implementations must classify failures into [`WsError`].
#[async_trait]
pub trait WsTransport: Send + Sync {
    /// Invoke a read-only web service function.
    async fn read(&self, ws_function: &str, params: Value) -> Result<Value, WsError>;

    /// Invoke a mutating web service function. Writes are never cached.
    async fn write(&self, ws_function: &str, params: Value) -> Result<Value, WsError>;
}
