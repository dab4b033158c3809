//! # Depot Identity
//!
//! Identity records and credential verification for the Depot platform.
//!
//! ## Overview
//!
//! The depot-identity crate handles:
//! - **Identities**: authenticatable actor records (name, email, role,
//!   optional department, active/inactive status)
//! - **Credentials**: one-way password hashing and verification
//! - **Departments**: the read interface for the optional scoping
//!   dimension attached to identities and document records
//! - **Storage**: the [`IdentityStore`] and [`DepartmentStore`] seams
//!   with in-memory implementations
//!
//! ## Secret handling
//!
//! The password secret exists in two explicit views instead of a dynamic
//! projection: [`Identity`] (the public view, no secret anywhere in the
//! type) and [`IdentityCredentials`] (the verification view, adding the
//! [`PasswordHash`]). Only the password-verification path ever constructs
//! the latter. The hash is computed whenever the plaintext is set or
//! changed; plaintext is never stored or compared directly.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use depot_identity::{IdentityStore, MemoryIdentityStore, NewIdentity};
//! use uuid::Uuid;
//!
//! # async fn demo(role_id: Uuid) -> Result<(), depot_identity::IdentityError> {
//! let store = MemoryIdentityStore::new();
//!
//! let identity = store
//!     .create(NewIdentity::new("Alice", "alice@example.com", "s3cret!", role_id))
//!     .await?;
//!
//! let verified = store
//!     .verify_credentials("alice@example.com", "s3cret!")
//!     .await?;
//! assert_eq!(verified.id, identity.id);
//! # Ok(())
//! # }
//! ```

pub mod department;
pub mod identity;
pub mod pagination;
pub mod password;
pub mod store;

// Re-export main types for convenience
pub use department::{Department, DepartmentStore, MemoryDepartmentStore};
pub use identity::{
    Identity, IdentityCredentials, IdentityStatus, IdentityUpdate, NewIdentity,
};
pub use pagination::{Page, PageRequest};
pub use password::PasswordHash;
pub use store::{IdentityError, IdentityQuery, IdentityResult, IdentityStore, MemoryIdentityStore};
