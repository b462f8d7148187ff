//! Record operation errors.

use thiserror::Error;

/// Errors surfaced by record adapters and the soft-delete/versioning engines.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Record absent, already deleted, or outside the caller's scope.
    ///
    /// These three cases are deliberately merged so a response never reveals
    /// whether a record exists in a business area the caller cannot see.
    #[error("record not found")]
    NotFoundOrForbidden,

    /// Caller is authenticated but may not act on this business area.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Invalid input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Underlying datastore failure.
    #[error("repository error: {0}")]
    Repository(String),
}

impl RecordError {
    /// Create a forbidden error.
    #[must_use]
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
