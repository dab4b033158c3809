//! Error types for authentication and authorization
//!
//! This is the boundary taxonomy: every operation behind the gate
//! converts its failures into one of these kinds, and the transport layer
//! maps them onto HTTP statuses via [`AuthError::status_code`].

use depot_identity::IdentityError;
use depot_rbac::RbacError;
use thiserror::Error;

/// Authentication and authorization error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing/malformed bearer token, or the identity behind a valid
    /// token no longer exists.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Session token has expired.
    #[error("Session token has expired")]
    TokenExpired,

    /// Session token is malformed or its signature does not verify.
    #[error("Invalid session token: {0}")]
    TokenInvalid(String),

    /// Unknown email or wrong secret at login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Valid token, but the account has been disabled.
    #[error("Account is disabled")]
    AccountDisabled,

    /// The caller's role lacks the required permission.
    #[error("Permission denied: requires {required}")]
    PermissionDenied {
        /// Rendering of the unmet requirement, for diagnostics.
        required: String,
    },

    /// Refused for a reason other than a missing permission: ownership
    /// scoping, an immutable role, or a protected identity.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Referenced record, role, permission, or department does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Service is misconfigured (e.g. missing token secret or seed role).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected failure. Logged in full server-side; callers get a
    /// generic message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Expected failures (bad credentials, missing permissions) are not
    /// server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Internal(_) | AuthError::Configuration(_))
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Unauthenticated(_)
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_)
            | AuthError::InvalidCredentials => 401,

            AuthError::AccountDisabled
            | AuthError::PermissionDenied { .. }
            | AuthError::Forbidden(_) => 403,

            AuthError::NotFound(_) => 404,
            AuthError::Conflict(_) => 409,
            AuthError::Validation(_) => 400,

            AuthError::Configuration(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get the machine-readable error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated(_) => "UNAUTHENTICATED",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::TokenInvalid(_) => "TOKEN_INVALID",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountDisabled => "ACCOUNT_DISABLED",
            AuthError::PermissionDenied { .. } => "PERMISSION_DENIED",
            AuthError::Forbidden(_) => "FORBIDDEN",
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::Conflict(_) => "CONFLICT",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Configuration(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => AuthError::InvalidCredentials,
            IdentityError::AccountDisabled => AuthError::AccountDisabled,
            IdentityError::DuplicateEmail(email) => {
                AuthError::Conflict(format!("email '{email}' is already registered"))
            }
            IdentityError::NotFound => AuthError::NotFound("identity".into()),
            IdentityError::ProtectedIdentity => {
                AuthError::Forbidden("this account cannot be deleted".into())
            }
            IdentityError::Validation(message) => AuthError::Validation(message),
            IdentityError::Internal(message) => AuthError::Internal(message),
        }
    }
}

impl From<RbacError> for AuthError {
    fn from(err: RbacError) -> Self {
        match err {
            RbacError::RoleNotFound => AuthError::NotFound("role".into()),
            RbacError::PermissionNotFound(name) => {
                AuthError::NotFound(format!("permission '{name}'"))
            }
            RbacError::ImmutableRole(slug) => {
                AuthError::Forbidden(format!("permissions of role '{slug}' cannot be changed"))
            }
            RbacError::Internal(message) => AuthError::Internal(message),
        }
    }
}
