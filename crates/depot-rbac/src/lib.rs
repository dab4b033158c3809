//! # Depot RBAC (Role-Based Access Control)
//!
//! This crate provides role-based access control for the Depot platform:
//! a flat catalog of named permissions, roles that bundle them, and the
//! store answering "does role R hold permission P".
//!
//! ## Overview
//!
//! The depot-rbac crate handles:
//! - **Permissions**: atomic named capabilities (e.g. `manage_users`)
//! - **Roles**: named buckets of permissions with a unique slug
//! - **Grants**: the many-to-many role→permission relation
//! - **Requirements**: what an endpoint demands, with an ALL/ANY combinator
//!
//! ## Architecture
//!
//! ```text
//! Role ──< grants >── Permission
//!
//! permissions_of(role)      -> PermissionSet
//! has_permission(role, p)   -> bool
//! replace_permissions(r, S) -> grant set becomes exactly S (atomic)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use depot_rbac::{MemoryRoleStore, PermissionRef, RoleStore};
//!
//! # async fn demo() -> Result<(), depot_rbac::RbacError> {
//! let store = MemoryRoleStore::with_defaults();
//! let role = store.role_by_slug("reviewer").await?;
//!
//! store
//!     .replace_permissions(role.id, &[PermissionRef::name("approve_documents")])
//!     .await?;
//!
//! assert!(store.has_permission(role.id, "approve_documents").await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Root role
//!
//! The role with slug [`ROOT_ROLE_SLUG`] is immutable: any attempt to
//! replace its grant set fails with [`RbacError::ImmutableRole`],
//! regardless of the caller's own permissions.
//!
//! ## Integration
//!
//! This crate is consumed by `depot-auth` (the authorization gate resolves
//! a caller's role to a [`PermissionSet`] on every request) and by
//! `depot-archive` (lifecycle transition guards name required permissions).

pub mod permission;
pub mod role;
pub mod store;

// Re-export main types for convenience
pub use permission::{Permission, PermissionRequirement, PermissionSet};
pub use role::{Role, DEFAULT_ROLE_SLUG, ROOT_ROLE_SLUG};
pub use store::{MemoryRoleStore, PermissionRef, RbacError, RbacResult, RoleStore};
