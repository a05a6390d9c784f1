//! Engine error taxonomy.
//!
//! Every error here is a local, recoverable condition reported to the
//! caller; a rejected operation mutates nothing. The engine has no fatal
//! error path; even an internal invariant violation aborts only the
//! offending operation.

use thiserror::Error;

/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured rejection reasons.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Wrong turn or session, unknown skill or unit, or a disabled state
    /// (e.g. silenced).
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// An energy, cooldown, or stack requirement was not met.
    #[error("insufficient resource: {0}")]
    InsufficientResource(String),

    /// No open session with the given id.
    #[error("session not found")]
    SessionNotFound,

    /// The player is already waiting in a queue.
    #[error("player is already queued")]
    AlreadyQueued,

    /// The player is already a member of an open session.
    #[error("player is already in a session")]
    AlreadyInSession,

    /// An engine invariant was violated (e.g. the acting member is missing
    /// from its own session). Aborts the operation, never the process.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidAction`].
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidAction(reason.into())
    }

    /// Shorthand for an [`EngineError::InsufficientResource`].
    #[must_use]
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientResource(reason.into())
    }

    /// Shorthand for an [`EngineError::InternalInconsistency`].
    #[must_use]
    pub fn inconsistency(reason: impl Into<String>) -> Self {
        Self::InternalInconsistency(reason.into())
    }
}
