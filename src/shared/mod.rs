pub mod best_effort;
pub mod config;
pub mod error;

pub use best_effort::{best_effort, best_effort_or};
pub use config::AppConfig;
pub use error::{AppError, Result};
