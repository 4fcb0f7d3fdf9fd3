//! Error types for the drivelib library.

use thiserror::Error;

use crate::util::FileRejection;

/// Main error type for drivelib operations.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Network request error (connection refused, DNS, broken body...).
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Local filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed base URL or endpoint.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server rejected the credentials (401) or the access (403).
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    /// An authenticated call was attempted without a token.
    #[error("{0}")]
    NotAuthenticated(&'static str),

    /// A bearer token could not be decoded.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// File rejected before upload.
    #[error(transparent)]
    InvalidFile(#[from] FileRejection),

    /// Persistent session storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Custom error message.
    #[error("{0}")]
    Custom(String),
}

impl DriveError {
    /// True for 401/403 responses, which invalidate the current session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, DriveError::Unauthorized { .. })
    }

    /// HTTP status carried by the error, if it came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            DriveError::Api { status, .. } | DriveError::Unauthorized { status, .. } => {
                Some(*status)
            }
            DriveError::RequestError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for drivelib operations.
pub type Result<T> = std::result::Result<T, DriveError>;
