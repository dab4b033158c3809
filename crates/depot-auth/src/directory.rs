//! Identity directory
//!
//! Admin-side identity management: listing, creating, updating, and
//! deleting identity records. Every operation here sits behind the gate
//! with a `manage_users` requirement; the service itself only enforces
//! the rules the gate cannot see (self-deletion, reference resolution).

use std::sync::Arc;

use uuid::Uuid;

use depot_identity::{
    Department, DepartmentStore, Identity, IdentityQuery, IdentityStatus, IdentityStore,
    IdentityUpdate, NewIdentity, Page,
};
use depot_rbac::{Role, RoleStore};

use crate::error::{AuthError, AuthResult};
use crate::gate::AuthContext;

/// A role reference: direct id, or lookup by display name or slug.
///
/// An unresolved lookup fails loudly with `NotFound`; bad input is never
/// silently dropped.
#[derive(Debug, Clone)]
pub enum RoleSelector {
    /// Direct reference by role ID.
    Id(Uuid),
    /// Lookup by display name or slug.
    Name(String),
}

/// A department reference: direct id, or lookup by display name.
#[derive(Debug, Clone)]
pub enum DepartmentSelector {
    /// Direct reference by department ID.
    Id(Uuid),
    /// Lookup by display name.
    Name(String),
}

/// Directory service configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Initial secret for admin-created identities when none is
    /// supplied. The account holder is expected to change it.
    pub default_secret: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_secret: "123456".to_string(),
        }
    }
}

/// Input for admin identity creation.
#[derive(Debug, Clone)]
pub struct CreateIdentityRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext secret; the configured default is used when absent.
    pub secret: Option<String>,
    /// Optional external personnel id.
    pub personnel_id: Option<String>,
    /// Role to assign.
    pub role: RoleSelector,
    /// Optional department scope.
    pub department: Option<DepartmentSelector>,
    /// Initial status; active when absent.
    pub status: Option<IdentityStatus>,
}

/// Input for admin identity update; every field independently optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateIdentityRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New plaintext secret.
    pub secret: Option<String>,
    /// Set or clear the personnel id.
    pub personnel_id: Option<Option<String>>,
    /// New role.
    pub role: Option<RoleSelector>,
    /// Set or clear the department scope.
    pub department: Option<Option<DepartmentSelector>>,
    /// New status.
    pub status: Option<IdentityStatus>,
}

/// Admin identity management service.
pub struct DirectoryService {
    identities: Arc<dyn IdentityStore>,
    roles: Arc<dyn RoleStore>,
    departments: Arc<dyn DepartmentStore>,
    config: DirectoryConfig,
}

impl DirectoryService {
    /// Create a new directory service.
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        roles: Arc<dyn RoleStore>,
        departments: Arc<dyn DepartmentStore>,
        config: DirectoryConfig,
    ) -> Self {
        Self {
            identities,
            roles,
            departments,
            config,
        }
    }

    async fn resolve_role(&self, selector: &RoleSelector) -> AuthResult<Role> {
        match selector {
            RoleSelector::Id(id) => Ok(self.roles.role(*id).await?),
            RoleSelector::Name(name) => {
                let roles = self.roles.list_roles().await?;
                roles
                    .into_iter()
                    .find(|r| r.name == *name || r.slug == *name)
                    .ok_or_else(|| AuthError::NotFound(format!("role '{name}'")))
            }
        }
    }

    async fn resolve_department(
        &self,
        selector: &DepartmentSelector,
    ) -> AuthResult<Department> {
        match selector {
            DepartmentSelector::Id(id) => self
                .departments
                .department(*id)
                .await
                .map_err(|_| AuthError::NotFound(format!("department {id}"))),
            DepartmentSelector::Name(name) => self
                .departments
                .department_by_name(name)
                .await
                .map_err(|_| AuthError::NotFound(format!("department '{name}'"))),
        }
    }

    /// List identities with filters and pagination.
    pub async fn list(&self, query: &IdentityQuery) -> AuthResult<Page<Identity>> {
        Ok(self.identities.list(query).await?)
    }

    /// Load a single identity.
    pub async fn get(&self, id: Uuid) -> AuthResult<Identity> {
        Ok(self.identities.find(id).await?)
    }

    /// Create an identity.
    ///
    /// The role (and department, when given) may be referenced by id or
    /// by name; an unresolved name fails with `NotFound` instead of
    /// being ignored.
    pub async fn create(&self, request: CreateIdentityRequest) -> AuthResult<Identity> {
        let role = self.resolve_role(&request.role).await?;
        let department_id = match &request.department {
            Some(selector) => Some(self.resolve_department(selector).await?.id),
            None => None,
        };

        let secret = request
            .secret
            .unwrap_or_else(|| self.config.default_secret.clone());

        let mut new = NewIdentity::new(request.name, request.email, secret, role.id);
        new.personnel_id = request.personnel_id;
        new.department_id = department_id;
        new.status = request.status.unwrap_or_default();

        Ok(self.identities.create(new).await?)
    }

    /// Apply a partial update to an identity.
    pub async fn update(&self, id: Uuid, request: UpdateIdentityRequest) -> AuthResult<Identity> {
        let mut update = IdentityUpdate::new();
        update.name = request.name;
        update.email = request.email;
        update.secret = request.secret;
        update.personnel_id = request.personnel_id;
        update.status = request.status;

        if let Some(selector) = &request.role {
            update.role_id = Some(self.resolve_role(selector).await?.id);
        }
        if let Some(department) = &request.department {
            update.department_id = Some(match department {
                Some(selector) => Some(self.resolve_department(selector).await?.id),
                None => None,
            });
        }

        Ok(self.identities.update(id, update).await?)
    }

    /// Delete an identity.
    ///
    /// Refused for the root account and for the caller's own account.
    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> AuthResult<()> {
        if ctx.identity_id() == id {
            return Err(AuthError::Forbidden(
                "you cannot delete your own account".to_string(),
            ));
        }
        Ok(self.identities.delete(id).await?)
    }
}
