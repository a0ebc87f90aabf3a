//! Error type for console API calls.

use console_session::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("authentication required: missing or expired session")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode API response: {0}")]
    Decode(String),

    #[error("invalid API configuration: {0}")]
    InvalidConfig(String),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// True for errors that mean the session itself is no longer usable.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
