//! Error types for the entity model.

use recoll_resource::{Operation, ResourceError};
use std::sync::Arc;
use thiserror::Error;

/// Result type for entity model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors surfaced through an operation's [`Pending`](crate::Pending).
///
/// Cloneable because every awaiter of a shared operation receives the same
/// outcome; transport errors are kept behind an `Arc` for that reason.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The operation needs an id and neither the caller nor the record had one.
    #[error("{operation} requires a record id")]
    MissingIdentifier { operation: Operation },

    /// The remote resource rejected the operation.
    #[error("remote {operation} failed: {source}")]
    RemoteOperation {
        operation: Operation,
        source: Arc<ResourceError>,
    },

    /// Some entities of a bulk save failed.
    #[error("bulk save failed for {failed} of {total} entities")]
    BulkSave { failed: usize, total: usize },
}

impl ModelError {
    pub(crate) fn remote(operation: Operation, error: ResourceError) -> Self {
        Self::RemoteOperation {
            operation,
            source: Arc::new(error),
        }
    }

    /// The transport error behind a [`RemoteOperation`](Self::RemoteOperation).
    pub fn resource_error(&self) -> Option<&ResourceError> {
        match self {
            Self::RemoteOperation { source, .. } => Some(source),
            _ => None,
        }
    }
}
