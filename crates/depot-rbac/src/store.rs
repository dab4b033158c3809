//! # Role store
//!
//! The storage seam for roles, the permission catalog, and role→permission
//! grants. The trait is async so implementations can sit on a database;
//! the in-memory implementation backs tests and single-process setups.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::permission::{names, Permission, PermissionSet};
use crate::role::{Role, DEFAULT_ROLE_SLUG, ROOT_ROLE_SLUG};

/// RBAC error types.
#[derive(Debug, Error)]
pub enum RbacError {
    /// Referenced role does not exist.
    #[error("Role not found")]
    RoleNotFound,

    /// Referenced permission does not exist in the catalog.
    #[error("Unknown permission: {0}")]
    PermissionNotFound(String),

    /// The root role's grant set cannot be changed.
    #[error("Permissions of role '{0}' are immutable")]
    ImmutableRole(String),

    /// Unexpected storage failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for RBAC operations.
pub type RbacResult<T> = Result<T, RbacError>;

/// A reference to a catalog permission, by id or by name.
///
/// `replace_permissions` accepts either form; both are resolved against
/// the catalog before any grant is touched, and unresolved input fails
/// loudly instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRef {
    /// Direct reference by permission ID.
    Id(Uuid),
    /// Lookup by unique permission name.
    Name(String),
}

impl PermissionRef {
    /// Reference a permission by name.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl From<Uuid> for PermissionRef {
    fn from(id: Uuid) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for PermissionRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Storage seam for roles, permissions, and grants.
///
/// Implementations must make [`RoleStore::replace_permissions`] atomic:
/// concurrent readers observe either the previous grant set or the new
/// one in full, never a partial union.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Load a role by id.
    async fn role(&self, id: Uuid) -> RbacResult<Role>;

    /// Load a role by its unique slug.
    async fn role_by_slug(&self, slug: &str) -> RbacResult<Role>;

    /// All roles, ordered by name.
    async fn list_roles(&self) -> RbacResult<Vec<Role>>;

    /// The full permission catalog, ordered by name.
    async fn list_permissions(&self) -> RbacResult<Vec<Permission>>;

    /// The set of permission names granted to a role.
    async fn permissions_of(&self, role_id: Uuid) -> RbacResult<PermissionSet>;

    /// Check whether a role holds a named permission.
    async fn has_permission(&self, role_id: Uuid, name: &str) -> RbacResult<bool> {
        Ok(self.permissions_of(role_id).await?.has(name))
    }

    /// Atomically replace a role's grant set.
    ///
    /// The resulting grant set equals exactly the supplied references,
    /// resolved to catalog permissions. Fails with
    /// [`RbacError::ImmutableRole`] for the root role and
    /// [`RbacError::PermissionNotFound`] if any reference does not
    /// resolve; on failure the previous grant set is untouched.
    ///
    /// # Returns
    ///
    /// The new grant set.
    async fn replace_permissions(
        &self,
        role_id: Uuid,
        grants: &[PermissionRef],
    ) -> RbacResult<PermissionSet>;
}

struct Inner {
    roles: HashMap<Uuid, Role>,
    catalog: Vec<Permission>,
    grants: HashMap<Uuid, HashSet<String>>,
}

/// In-memory role store.
///
/// Suitable for single-process deployments and tests. Atomicity of
/// `replace_permissions` falls out of the single write lock: the grant
/// set for a role is swapped in one assignment while readers are held
/// off.
pub struct MemoryRoleStore {
    inner: RwLock<Inner>,
}

impl MemoryRoleStore {
    /// Create an empty store with no roles or permissions.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                roles: HashMap::new(),
                catalog: Vec::new(),
                grants: HashMap::new(),
            }),
        }
    }

    /// Create a store seeded with the default catalog.
    ///
    /// Seeds the four stock roles (Super Admin, Department Admin,
    /// Reviewer, Contributor), the permission catalog, and grants: the
    /// root role holds everything, reviewers can approve, contributors
    /// (self-scoped) can upload.
    pub fn with_defaults() -> Self {
        let catalog = vec![
            Permission::new(names::MANAGE_USERS, "Manage identity records"),
            Permission::new(names::MANAGE_ROLES, "Edit role permission grants"),
            Permission::new(names::MANAGE_MASTER_DATA, "Manage departments and master data"),
            Permission::new(names::MANAGE_DOCUMENTS, "Manage any document record"),
            Permission::new(names::UPLOAD_DOCUMENTS, "Create document records"),
            Permission::new(names::APPROVE_DOCUMENTS, "Approve or reject submissions"),
        ];
        let all_names: HashSet<String> = catalog.iter().map(|p| p.name.clone()).collect();

        let root = Role::new("Super Admin", ROOT_ROLE_SLUG);
        let dept_admin = Role::new("Department Admin", "department-admin");
        let reviewer = Role::new("Reviewer", "reviewer");
        let contributor = Role::new("Contributor", DEFAULT_ROLE_SLUG).self_scoped();

        let mut grants: HashMap<Uuid, HashSet<String>> = HashMap::new();
        grants.insert(root.id, all_names);
        grants.insert(
            dept_admin.id,
            [names::MANAGE_DOCUMENTS, names::UPLOAD_DOCUMENTS, names::APPROVE_DOCUMENTS]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        grants.insert(
            reviewer.id,
            [names::APPROVE_DOCUMENTS].iter().map(|s| s.to_string()).collect(),
        );
        grants.insert(
            contributor.id,
            [names::UPLOAD_DOCUMENTS].iter().map(|s| s.to_string()).collect(),
        );

        let mut roles = HashMap::new();
        for role in [root, dept_admin, reviewer, contributor] {
            roles.insert(role.id, role);
        }

        Self {
            inner: RwLock::new(Inner {
                roles,
                catalog,
                grants,
            }),
        }
    }

    /// Insert a role (seed/test helper).
    pub async fn insert_role(&self, role: Role) {
        let mut inner = self.inner.write().await;
        inner.grants.entry(role.id).or_default();
        inner.roles.insert(role.id, role);
    }

    /// Insert a catalog permission (seed/test helper).
    pub async fn insert_permission(&self, permission: Permission) {
        self.inner.write().await.catalog.push(permission);
    }
}

impl Default for MemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn role(&self, id: Uuid) -> RbacResult<Role> {
        self.inner
            .read()
            .await
            .roles
            .get(&id)
            .cloned()
            .ok_or(RbacError::RoleNotFound)
    }

    async fn role_by_slug(&self, slug: &str) -> RbacResult<Role> {
        self.inner
            .read()
            .await
            .roles
            .values()
            .find(|r| r.slug == slug)
            .cloned()
            .ok_or(RbacError::RoleNotFound)
    }

    async fn list_roles(&self) -> RbacResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.inner.read().await.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn list_permissions(&self) -> RbacResult<Vec<Permission>> {
        let mut catalog = self.inner.read().await.catalog.clone();
        catalog.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(catalog)
    }

    async fn permissions_of(&self, role_id: Uuid) -> RbacResult<PermissionSet> {
        let inner = self.inner.read().await;
        if !inner.roles.contains_key(&role_id) {
            return Err(RbacError::RoleNotFound);
        }
        Ok(inner
            .grants
            .get(&role_id)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn replace_permissions(
        &self,
        role_id: Uuid,
        grants: &[PermissionRef],
    ) -> RbacResult<PermissionSet> {
        let mut inner = self.inner.write().await;

        let role = inner.roles.get(&role_id).ok_or(RbacError::RoleNotFound)?;
        if role.is_root() {
            return Err(RbacError::ImmutableRole(role.slug.clone()));
        }

        // Resolve every reference before touching the grant set, so a bad
        // input leaves the previous set intact.
        let mut resolved: HashSet<String> = HashSet::with_capacity(grants.len());
        for grant in grants {
            let permission = match grant {
                PermissionRef::Id(id) => inner.catalog.iter().find(|p| p.id == *id),
                PermissionRef::Name(name) => inner.catalog.iter().find(|p| p.name == *name),
            };
            match permission {
                Some(p) => {
                    resolved.insert(p.name.clone());
                }
                None => {
                    let shown = match grant {
                        PermissionRef::Id(id) => id.to_string(),
                        PermissionRef::Name(name) => name.clone(),
                    };
                    return Err(RbacError::PermissionNotFound(shown));
                }
            }
        }

        let set: PermissionSet = resolved.iter().cloned().collect();
        inner.grants.insert(role_id, resolved);
        Ok(set)
    }
}
