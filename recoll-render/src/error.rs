//! Error types for the renderer.

use thiserror::Error;

/// Result type for renderer setup.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while setting up a reconciler.
///
/// Rendering itself has no error path; failures inside the host surface are
/// the host's to report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The watch expression is not of the form `<alias> in <collection>`.
    #[error("invalid binding {expression:?}: {reason}")]
    BindingSyntax {
        expression: String,
        reason: &'static str,
    },
}
