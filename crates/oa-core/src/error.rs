//! Error types for oa-core

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for oa-core
#[derive(Error, Debug)]
pub enum Error {
    /// Connection failure or timeout while talking to the backend
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Backend body did not match the expected shape
    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Result type alias for oa-core
pub type Result<T> = std::result::Result<T, Error>;
