//! Shared types and configuration for the korea-now news feed and chat proxy.

pub mod app_config;
pub mod config;
pub mod news;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use news::{FeedDocument, NewsItem, DEFAULT_AUTHOR, UNTITLED};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
