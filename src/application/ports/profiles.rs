use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub full_name: String,
    pub picture_url: Option<String>,
}

/// Best-effort user profile lookup used to put an author name and avatar
/// on virtual offline items. Failures are ignorable.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn profile(&self, user_id: i64) -> Result<UserProfile, AppError>;
}
