use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Could not reach the server. Always recoverable by retrying later;
    /// pending data is preserved.
    Connectivity(String),
    /// The server understood the request and explicitly rejected it.
    /// Terminal for the action that caused it.
    WebService(String),
    /// An offline draft with the same identity already exists.
    DuplicateKey(String),
    /// Sync was requested while the resource is blocked by a foreground edit.
    SyncBlocked(String),
    Storage(String),
    Transport(String),
    NotFound(String),
    InvalidInput(String),
    ValidationError(String),
    SerializationError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Connectivity(msg) => write!(f, "Connectivity error: {}", msg),
            AppError::WebService(msg) => write!(f, "Web service error: {}", msg),
            AppError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            AppError::SyncBlocked(msg) => write!(f, "Sync blocked: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Whether the server rejected the request itself, as opposed to the
    /// request never arriving. Decides whether an offline action is
    /// discarded or kept for a later retry.
    pub fn is_web_service_error(&self) -> bool {
        matches!(self, AppError::WebService(_))
    }

    pub fn is_connectivity_error(&self) -> bool {
        matches!(self, AppError::Connectivity(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return AppError::DuplicateKey(db_err.to_string());
            }
        }
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
