//! Error types for Drivegen Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authorization exchange failed: {0}")]
    AuthExchange(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Content exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
