//! # Roles
//!
//! A role is a named bucket of permissions assigned to exactly one per
//! identity. Roles are seeded at system initialization; creating and
//! deleting them belongs to external master-data management.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Slug of the root/super-admin role.
///
/// The root role's grant set is immutable: `replace_permissions` refuses
/// to touch it no matter who asks.
pub const ROOT_ROLE_SLUG: &str = "super-admin";

/// Slug of the role assigned to public self-registrations.
///
/// Registration always assigns this role server-side, ignoring anything
/// the caller supplies, so privilege escalation via the registration
/// endpoint is not possible.
pub const DEFAULT_ROLE_SLUG: &str = "contributor";

/// A named bucket of permissions.
///
/// # Self-scoped roles
///
/// A role flagged `self_scoped` restricts its holders to resources they
/// created themselves: every list/read/update/delete on document records
/// is intersected with `uploaded_by == caller`. The flag is the single
/// predicate the ownership filter consumes; handlers never inspect slugs.
///
/// # Examples
///
/// ```
/// use depot_rbac::Role;
///
/// let role = Role::new("Contributor", "contributor").self_scoped();
/// assert!(role.self_scoped);
/// assert!(!role.is_root());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Unique role ID.
    pub id: Uuid,

    /// Unique display name.
    pub name: String,

    /// Unique machine slug.
    pub slug: String,

    /// Whether holders only see/mutate resources they created.
    #[serde(default)]
    pub self_scoped: bool,
}

impl Role {
    /// Create a new role.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique display name
    /// * `slug` - Unique machine slug
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            self_scoped: false,
        }
    }

    /// Mark this role as restricted to self-owned resources.
    pub fn self_scoped(mut self) -> Self {
        self.self_scoped = true;
        self
    }

    /// Check whether this is the immutable root role.
    pub fn is_root(&self) -> bool {
        self.slug == ROOT_ROLE_SLUG
    }
}
