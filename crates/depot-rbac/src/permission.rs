//! # Permissions
//!
//! Atomic named capabilities and the sets/requirements built from them.
//! Permissions are seeded master data; this crate treats the catalog as
//! read-only apart from role grants.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Well-known permission names seeded at system initialization.
///
/// Endpoints and lifecycle guards reference these constants rather than
/// repeating string literals.
pub mod names {
    /// Manage identity records (list, create, update, delete).
    pub const MANAGE_USERS: &str = "manage_users";
    /// View roles and edit role→permission grants.
    pub const MANAGE_ROLES: &str = "manage_roles";
    /// Manage departments and other master data.
    pub const MANAGE_MASTER_DATA: &str = "manage_master_data";
    /// Full management of document records (edit, delete any record).
    pub const MANAGE_DOCUMENTS: &str = "manage_documents";
    /// Create new document records.
    pub const UPLOAD_DOCUMENTS: &str = "upload_documents";
    /// Approve or reject submitted document records.
    pub const APPROVE_DOCUMENTS: &str = "approve_documents";
}

/// A permission is an atomic named capability.
///
/// Unlike resource:action schemes, Depot permissions are a flat catalog of
/// unique names checked by the authorization gate.
///
/// # Example
///
/// ```
/// use depot_rbac::Permission;
///
/// let perm = Permission::new("manage_users", "Manage identity records");
/// assert_eq!(perm.name, "manage_users");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    /// Unique permission ID.
    pub id: Uuid,
    /// Unique machine name (e.g. "manage_users").
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
}

impl Permission {
    /// Create a new permission catalog entry.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique machine name
    /// * `description` - Human-readable description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: Some(description.into()),
        }
    }
}

/// The set of permission names granted to a role.
///
/// # Example
///
/// ```
/// use depot_rbac::PermissionSet;
///
/// let set = PermissionSet::from_names(["manage_users", "manage_roles"]);
/// assert!(set.has("manage_users"));
/// assert!(!set.has("approve_documents"));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: HashSet<String>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Create from an iterator of permission names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a permission name to the set.
    pub fn add(&mut self, name: impl Into<String>) {
        self.permissions.insert(name.into());
    }

    /// Remove a permission name from the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove(&mut self, name: &str) -> bool {
        self.permissions.remove(name)
    }

    /// Check whether the set grants a permission.
    pub fn has(&self, name: &str) -> bool {
        self.permissions.contains(name)
    }

    /// All permission names in the set, sorted for stable output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.permissions.iter().cloned().collect();
        names.sort();
        names
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

/// What an endpoint or transition guard demands of a caller.
///
/// A requirement is a set of permission names with an explicit ALL/ANY
/// combinator, so an endpoint where a narrower scoped permission should
/// suffice alongside a broader one can say so directly instead of
/// hard-coding a single name.
///
/// # Example
///
/// ```
/// use depot_rbac::{PermissionRequirement, PermissionSet};
///
/// let granted = PermissionSet::from_names(["upload_documents"]);
///
/// let any = PermissionRequirement::any(["manage_documents", "upload_documents"]);
/// assert!(any.satisfied_by(&granted));
///
/// let all = PermissionRequirement::all(["manage_documents", "upload_documents"]);
/// assert!(!all.satisfied_by(&granted));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionRequirement {
    /// The caller must hold every listed permission.
    All(Vec<String>),
    /// The caller must hold at least one listed permission.
    Any(Vec<String>),
}

impl PermissionRequirement {
    /// Require a single permission.
    pub fn single(name: impl Into<String>) -> Self {
        Self::All(vec![name.into()])
    }

    /// Require every listed permission.
    pub fn all<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::All(names.into_iter().map(Into::into).collect())
    }

    /// Require at least one listed permission.
    pub fn any<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Any(names.into_iter().map(Into::into).collect())
    }

    /// Check whether a granted set satisfies this requirement.
    ///
    /// An empty `All` is vacuously satisfied; an empty `Any` never is.
    pub fn satisfied_by(&self, granted: &PermissionSet) -> bool {
        match self {
            Self::All(names) => names.iter().all(|n| granted.has(n)),
            Self::Any(names) => names.iter().any(|n| granted.has(n)),
        }
    }

    /// The permission names this requirement mentions, for diagnostics.
    pub fn required_names(&self) -> &[String] {
        match self {
            Self::All(names) | Self::Any(names) => names,
        }
    }
}

impl fmt::Display for PermissionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All(names) => write!(f, "{}", names.join(" and ")),
            Self::Any(names) => write!(f, "{}", names.join(" or ")),
        }
    }
}
