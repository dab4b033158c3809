//! Error types for document operations

use thiserror::Error;

use crate::status::{DocumentStatus, LifecycleEvent};

/// Document operation error types.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Referenced document record does not exist (or is hidden by the
    /// strict ownership policy).
    #[error("Document not found")]
    NotFound,

    /// Ownership scoping refused access to an existing record.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The caller's role lacks the permission a guard demands.
    #[error("Permission denied: requires {required}")]
    PermissionDenied {
        /// Rendering of the unmet requirement, for diagnostics.
        required: String,
    },

    /// No transition is defined for this status/event pair.
    #[error("Cannot {event} a document in status '{from}'")]
    InvalidTransition {
        /// Status the record was in.
        from: DocumentStatus,
        /// The attempted lifecycle event.
        event: LifecycleEvent,
    },

    /// The record changed under the caller (stale status on a
    /// transition).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unexpected failure. Logged in full server-side.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for document operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

impl ArchiveError {
    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ArchiveError::Internal(_))
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ArchiveError::NotFound => 404,
            ArchiveError::Forbidden(_) | ArchiveError::PermissionDenied { .. } => 403,
            ArchiveError::InvalidTransition { .. } | ArchiveError::Conflict(_) => 409,
            ArchiveError::Validation(_) => 400,
            ArchiveError::Internal(_) => 500,
        }
    }

    /// Get the machine-readable error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ArchiveError::NotFound => "NOT_FOUND",
            ArchiveError::Forbidden(_) => "FORBIDDEN",
            ArchiveError::PermissionDenied { .. } => "PERMISSION_DENIED",
            ArchiveError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ArchiveError::Conflict(_) => "CONFLICT",
            ArchiveError::Validation(_) => "VALIDATION_ERROR",
            ArchiveError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
