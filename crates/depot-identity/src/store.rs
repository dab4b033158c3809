//! Identity store
//!
//! The storage seam for identity records. Implementations own secret
//! hygiene: the plaintext in [`NewIdentity`]/[`IdentityUpdate`] is hashed
//! at write time and only ever read back through the explicit
//! [`IdentityCredentials`] verification view.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::identity::{
    is_valid_email, Identity, IdentityCredentials, IdentityStatus, IdentityUpdate, NewIdentity,
};
use crate::pagination::{Page, PageRequest};
use crate::password::PasswordHash;

/// Identity error types.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Unknown email or wrong secret. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The account exists and the token/credentials were valid, but the
    /// account has been disabled.
    #[error("Account is disabled")]
    AccountDisabled,

    /// Email is already registered.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// Referenced identity or department does not exist.
    #[error("Not found")]
    NotFound,

    /// The root account (or the caller's own account) cannot be deleted.
    #[error("This account cannot be deleted")]
    ProtectedIdentity,

    /// Missing or malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unexpected storage failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Filters for listing identities.
#[derive(Debug, Clone, Default)]
pub struct IdentityQuery {
    /// Case-insensitive substring match against name, email, or
    /// personnel id.
    pub search: Option<String>,
    /// Restrict to a role.
    pub role_id: Option<Uuid>,
    /// Restrict to a status.
    pub status: Option<IdentityStatus>,
    /// Page window.
    pub page: PageRequest,
}

impl IdentityQuery {
    fn matches(&self, identity: &Identity) -> bool {
        if let Some(role_id) = self.role_id {
            if identity.role_id != role_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if identity.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let personnel = identity.personnel_id.as_deref().unwrap_or("");
            if !identity.name.to_lowercase().contains(&needle)
                && !identity.email.to_lowercase().contains(&needle)
                && !personnel.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Storage seam for identity records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create an identity.
    ///
    /// Validates the email format, enforces email uniqueness, and hashes
    /// the secret before anything is persisted.
    async fn create(&self, new: NewIdentity) -> IdentityResult<Identity>;

    /// Load the public view by id.
    async fn find(&self, id: Uuid) -> IdentityResult<Identity>;

    /// Load the verification view by email.
    ///
    /// This is the only read that exposes the password hash; it exists
    /// for password-verification paths and nothing else.
    async fn find_with_secret(&self, email: &str) -> IdentityResult<IdentityCredentials>;

    /// List identities with filters and pagination.
    async fn list(&self, query: &IdentityQuery) -> IdentityResult<Page<Identity>>;

    /// Apply a partial update.
    ///
    /// A changed email is re-checked for uniqueness; a changed secret is
    /// re-hashed. References are expected to be resolved already (an
    /// unresolved role/department name fails with `NotFound` at the
    /// service layer, never silently ignored).
    async fn update(&self, id: Uuid, update: IdentityUpdate) -> IdentityResult<Identity>;

    /// Replace the secret.
    ///
    /// Previously issued tokens remain valid until expiry; there is no
    /// revocation.
    async fn change_secret(&self, id: Uuid, new_plaintext: &str) -> IdentityResult<()> {
        self.update(id, IdentityUpdate::new().secret(new_plaintext))
            .await
            .map(|_| ())
    }

    /// Delete an identity.
    ///
    /// Refused for the root account. Callers must additionally refuse
    /// deletion of the caller's own account before invoking this.
    async fn delete(&self, id: Uuid) -> IdentityResult<()>;

    /// Verify login credentials. Pure check, no side effects.
    ///
    /// Unknown email and hash mismatch both fail with
    /// [`IdentityError::InvalidCredentials`]; a disabled account fails
    /// with [`IdentityError::AccountDisabled`] before the hash is
    /// compared.
    async fn verify_credentials(&self, email: &str, secret: &str) -> IdentityResult<Identity> {
        let credentials = match self.find_with_secret(email).await {
            Ok(credentials) => credentials,
            Err(IdentityError::NotFound) => return Err(IdentityError::InvalidCredentials),
            Err(other) => return Err(other),
        };
        if !credentials.identity.status.is_active() {
            return Err(IdentityError::AccountDisabled);
        }
        if !credentials.matches(secret) {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(credentials.identity)
    }
}

struct StoredIdentity {
    identity: Identity,
    password: PasswordHash,
}

/// In-memory identity store.
///
/// Suitable for single-process deployments and tests.
pub struct MemoryIdentityStore {
    inner: RwLock<HashMap<Uuid, StoredIdentity>>,
}

impl MemoryIdentityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create(&self, new: NewIdentity) -> IdentityResult<Identity> {
        if new.name.trim().is_empty() {
            return Err(IdentityError::Validation("name must not be empty".into()));
        }
        if !is_valid_email(&new.email) {
            return Err(IdentityError::Validation(format!(
                "'{}' is not a valid email address",
                new.email
            )));
        }

        let password = PasswordHash::new(&new.secret)?;
        let mut inner = self.inner.write().await;

        if inner
            .values()
            .any(|stored| stored.identity.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(IdentityError::DuplicateEmail(new.email));
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::now_v7(),
            name: new.name,
            email: new.email,
            personnel_id: new.personnel_id,
            role_id: new.role_id,
            department_id: new.department_id,
            status: new.status,
            is_root: new.is_root,
            created_at: now,
            updated_at: now,
        };
        debug!(identity = %identity.id, "identity created");
        inner.insert(
            identity.id,
            StoredIdentity {
                identity: identity.clone(),
                password,
            },
        );
        Ok(identity)
    }

    async fn find(&self, id: Uuid) -> IdentityResult<Identity> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|stored| stored.identity.clone())
            .ok_or(IdentityError::NotFound)
    }

    async fn find_with_secret(&self, email: &str) -> IdentityResult<IdentityCredentials> {
        self.inner
            .read()
            .await
            .values()
            .find(|stored| stored.identity.email.eq_ignore_ascii_case(email))
            .map(|stored| IdentityCredentials {
                identity: stored.identity.clone(),
                password: stored.password.clone(),
            })
            .ok_or(IdentityError::NotFound)
    }

    async fn list(&self, query: &IdentityQuery) -> IdentityResult<Page<Identity>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Identity> = inner
            .values()
            .map(|stored| &stored.identity)
            .filter(|identity| query.matches(identity))
            .cloned()
            .collect();
        // Newest first, matching the admin listing in the API.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::from_filtered(matching, query.page))
    }

    async fn update(&self, id: Uuid, update: IdentityUpdate) -> IdentityResult<Identity> {
        // Hash outside the write lock; bcrypt is deliberately slow.
        let new_password = match &update.secret {
            Some(plaintext) => Some(PasswordHash::new(plaintext)?),
            None => None,
        };

        let mut inner = self.inner.write().await;

        if let Some(email) = &update.email {
            if !is_valid_email(email) {
                return Err(IdentityError::Validation(format!(
                    "'{email}' is not a valid email address"
                )));
            }
            let taken = inner.values().any(|stored| {
                stored.identity.id != id && stored.identity.email.eq_ignore_ascii_case(email)
            });
            if taken {
                return Err(IdentityError::DuplicateEmail(email.clone()));
            }
        }

        let stored = inner.get_mut(&id).ok_or(IdentityError::NotFound)?;

        if let Some(name) = update.name {
            stored.identity.name = name;
        }
        if let Some(email) = update.email {
            stored.identity.email = email;
        }
        if let Some(personnel_id) = update.personnel_id {
            stored.identity.personnel_id = personnel_id;
        }
        if let Some(role_id) = update.role_id {
            stored.identity.role_id = role_id;
        }
        if let Some(department_id) = update.department_id {
            stored.identity.department_id = department_id;
        }
        if let Some(status) = update.status {
            stored.identity.status = status;
        }
        if let Some(password) = new_password {
            stored.password = password;
        }
        stored.identity.updated_at = Utc::now();

        Ok(stored.identity.clone())
    }

    async fn delete(&self, id: Uuid) -> IdentityResult<()> {
        let mut inner = self.inner.write().await;
        let stored = inner.get(&id).ok_or(IdentityError::NotFound)?;
        if stored.identity.is_root {
            return Err(IdentityError::ProtectedIdentity);
        }
        inner.remove(&id);
        Ok(())
    }
}
