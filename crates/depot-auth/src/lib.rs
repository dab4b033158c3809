//! # Depot Authentication
//!
//! Session tokens and the authorization gate for the Depot platform.
//!
//! ## Overview
//!
//! The depot-auth crate handles:
//! - **Tokens**: signed, time-bounded session tokens asserting an
//!   identity id and nothing else
//! - **Gate**: the per-request pipeline stage that verifies the token,
//!   reloads the identity with role and department, and enforces a
//!   permission requirement before the handler runs
//! - **Auth surface**: login, registration, profile, and secret changes
//! - **Directory**: admin identity management behind `manage_users`
//! - **Errors**: the boundary taxonomy with HTTP status and machine
//!   codes
//!
//! ## Control flow
//!
//! ```text
//! request ─ bearer token ─▶ TokenService::verify
//!        ─ identity id ──▶ IdentityStore::find  (+ role, department)
//!        ─ requirement ──▶ RoleStore::permissions_of
//!        ─ admitted ─────▶ handler(AuthContext)
//! ```
//!
//! Because the token carries no role or permission claims, a grant
//! change takes effect on the caller's very next request without any
//! token reissue. There is no revocation: a token stays valid until it
//! expires, though a disabled account is refused at the gate regardless.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use depot_auth::{AuthGate, TokenService};
//! use depot_identity::{MemoryDepartmentStore, MemoryIdentityStore};
//! use depot_rbac::{MemoryRoleStore, PermissionRequirement};
//!
//! # async fn demo(header: Option<&str>) -> Result<(), depot_auth::AuthError> {
//! let gate = AuthGate::new(
//!     Arc::new(TokenService::with_secret("signing-secret")?),
//!     Arc::new(MemoryIdentityStore::new()),
//!     Arc::new(MemoryRoleStore::with_defaults()),
//!     Arc::new(MemoryDepartmentStore::new()),
//! );
//!
//! let ctx = gate
//!     .authorize(header, &PermissionRequirement::single("manage_users"))
//!     .await?;
//! assert!(ctx.has_permission("manage_users"));
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod directory;
pub mod error;
pub mod gate;
pub mod service;
pub mod token;

// Re-export main types
pub use claims::SessionClaims;
pub use directory::{
    CreateIdentityRequest, DepartmentSelector, DirectoryConfig, DirectoryService, RoleSelector,
    UpdateIdentityRequest,
};
pub use error::{AuthError, AuthResult};
pub use gate::{AuthContext, AuthGate};
pub use service::{AuthConfig, AuthService, Profile, ProfileUpdate, RegisterRequest, Session};
pub use token::{TokenConfig, TokenService};
