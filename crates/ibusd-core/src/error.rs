//! Shared collaborator error type.

use thiserror::Error;

/// Errors surfaced by the bus writer and the backend collaborators.
///
/// Handlers treat every variant the same way: log a warning and carry
/// on. The variants exist for diagnostics, not for control flow.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend process is not reachable.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with something we could not use.
    #[error("backend protocol error: {0}")]
    Protocol(String),

    /// A playlist path could not be resolved.
    #[error("track not found: {0}")]
    TrackNotFound(String),

    /// Transport-level failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
