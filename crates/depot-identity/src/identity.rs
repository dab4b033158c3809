//! Identity domain models
//!
//! An identity is an authenticatable actor: account data, a reference to
//! exactly one role, an optional department scope, and an active/inactive
//! status. The password secret lives in a separate verification view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password::PasswordHash;

/// Account status of an identity.
///
/// Inactive identities keep their records and tokens, but the
/// authorization gate refuses them with an `AccountDisabled` error even
/// while a previously issued token is still unexpired.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    /// Account may authenticate and act.
    Active,
    /// Account is disabled; authentication and authorization are refused.
    Inactive,
}

impl IdentityStatus {
    /// Get the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Check whether the account may act.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Default for IdentityStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Public view of an authenticatable actor.
///
/// This type carries no secret material at all; the verification view is
/// [`IdentityCredentials`], constructed only on password-verification
/// paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identity ID.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Unique, format-validated email address.
    pub email: String,

    /// Optional external personnel id (staff/student number).
    pub personnel_id: Option<String>,

    /// The identity's single role.
    pub role_id: Uuid,

    /// Optional department scope; `None` means unscoped.
    pub department_id: Option<Uuid>,

    /// Account status.
    pub status: IdentityStatus,

    /// Whether this is the immutable root account.
    ///
    /// The root account cannot be deleted.
    #[serde(default)]
    pub is_root: bool,

    /// When the identity was created.
    pub created_at: DateTime<Utc>,

    /// When the identity was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Verification view: an identity together with its password hash.
///
/// Constructed explicitly by the store's credential lookup; never
/// serialized in responses.
#[derive(Debug, Clone)]
pub struct IdentityCredentials {
    /// The public identity view.
    pub identity: Identity,
    /// One-way hash of the password secret.
    pub password: PasswordHash,
}

impl IdentityCredentials {
    /// Check a plaintext secret against the stored hash.
    pub fn matches(&self, plaintext: &str) -> bool {
        self.password.verify(plaintext)
    }
}

/// Fields for creating a new identity.
///
/// # Examples
///
/// ```
/// use depot_identity::NewIdentity;
/// use uuid::Uuid;
///
/// let role_id = Uuid::now_v7();
/// let new = NewIdentity::new("Alice", "alice@example.com", "s3cret!", role_id)
///     .with_personnel_id("NIP-042");
/// assert_eq!(new.email, "alice@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Display name.
    pub name: String,
    /// Email address (validated at creation).
    pub email: String,
    /// Plaintext secret; hashed by the store at write time.
    pub secret: String,
    /// Optional external personnel id.
    pub personnel_id: Option<String>,
    /// Role to assign.
    pub role_id: Uuid,
    /// Optional department scope.
    pub department_id: Option<Uuid>,
    /// Initial status.
    pub status: IdentityStatus,
    /// Mark as the immutable root account (bootstrap only).
    pub is_root: bool,
}

impl NewIdentity {
    /// Create a new-identity request with active status.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
        role_id: Uuid,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            secret: secret.into(),
            personnel_id: None,
            role_id,
            department_id: None,
            status: IdentityStatus::Active,
            is_root: false,
        }
    }

    /// Set the external personnel id.
    pub fn with_personnel_id(mut self, personnel_id: impl Into<String>) -> Self {
        self.personnel_id = Some(personnel_id.into());
        self
    }

    /// Set the department scope.
    pub fn with_department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: IdentityStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as the immutable root account.
    pub fn as_root(mut self) -> Self {
        self.is_root = true;
        self
    }
}

/// Partial update of an identity; every field is independently optional.
///
/// Clearable fields (personnel id, department) use a double `Option`:
/// the outer level says "touch this field", the inner level carries the
/// new value or `None` to clear it.
#[derive(Debug, Clone, Default)]
pub struct IdentityUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email (uniqueness re-checked).
    pub email: Option<String>,
    /// New plaintext secret; re-hashed at write time.
    pub secret: Option<String>,
    /// Set or clear the personnel id.
    pub personnel_id: Option<Option<String>>,
    /// New role.
    pub role_id: Option<Uuid>,
    /// Set or clear the department scope.
    pub department_id: Option<Option<Uuid>>,
    /// New status.
    pub status: Option<IdentityStatus>,
}

impl IdentityUpdate {
    /// An update that touches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Replace the secret.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set or clear the personnel id.
    pub fn personnel_id(mut self, personnel_id: Option<String>) -> Self {
        self.personnel_id = Some(personnel_id);
        self
    }

    /// Set the role.
    pub fn role(mut self, role_id: Uuid) -> Self {
        self.role_id = Some(role_id);
        self
    }

    /// Set or clear the department scope.
    pub fn department(mut self, department_id: Option<Uuid>) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Set the status.
    pub fn status(mut self, status: IdentityStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Check whether the update touches any field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.secret.is_none()
            && self.personnel_id.is_none()
            && self.role_id.is_none()
            && self.department_id.is_none()
            && self.status.is_none()
    }
}

/// Validate an email address shape: `local@domain.tld`, no whitespace.
///
/// This is a format gate, not RFC 5321 conformance.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
