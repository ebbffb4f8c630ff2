//! Error types for the transport layer.

use thiserror::Error;

/// Result type for transport operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Errors a remote resource can report.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request could not be built (e.g. a delete without an id).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ResourceError {
    /// Returns true if the remote side reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ResourceError::NotFound(_) => true,
            ResourceError::Status { status, .. } => *status == 404,
            ResourceError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 404),
            _ => false,
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResourceError::Status { status, .. } => Some(*status),
            ResourceError::NotFound(_) => Some(404),
            ResourceError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
