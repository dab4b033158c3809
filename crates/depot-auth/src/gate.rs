//! Authorization gate
//!
//! The request-pipeline stage every authenticated call passes through.
//! Conceptually a state machine:
//!
//! ```text
//! Unauthenticated -> TokenVerified -> IdentityLoaded -> PermissionChecked -> Admitted
//! ```
//!
//! - entry requires a bearer token; a missing or malformed header fails
//!   as `Unauthenticated`
//! - the identity is reloaded from the store together with its role and
//!   department; a vanished identity fails `Unauthenticated`, an inactive
//!   one fails `AccountDisabled` (403-class, the token itself was valid)
//! - for endpoints declaring a [`PermissionRequirement`], the role's
//!   grants are queried fresh; an unmet requirement fails
//!   `PermissionDenied` carrying the requirement for diagnostics
//! - admission yields the [`AuthContext`] handed to the handler

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use depot_identity::{Department, DepartmentStore, Identity, IdentityError, IdentityStore};
use depot_rbac::{PermissionRequirement, PermissionSet, Role, RoleStore};

use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// The admitted caller, exposed to downstream handlers.
///
/// Everything here was loaded fresh by the gate for this request; a
/// role or grant change is visible on the very next call.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The caller's identity (public view).
    pub identity: Identity,
    /// The caller's role.
    pub role: Role,
    /// The caller's department, when scoped and still present.
    pub department: Option<Department>,
    /// The role's permission grants at admission time.
    pub permissions: PermissionSet,
}

impl AuthContext {
    /// The caller's identity id.
    pub fn identity_id(&self) -> Uuid {
        self.identity.id
    }

    /// Check a single permission name.
    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.has(name)
    }

    /// Check whether the caller's role restricts it to self-owned
    /// resources.
    pub fn is_self_scoped(&self) -> bool {
        self.role.self_scoped
    }

    /// Fail with `PermissionDenied` unless the requirement is met.
    pub fn require(&self, requirement: &PermissionRequirement) -> AuthResult<()> {
        if requirement.satisfied_by(&self.permissions) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied {
                required: requirement.to_string(),
            })
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> AuthResult<&str> {
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::Unauthenticated(
            "authorization header is not a bearer token".to_string(),
        )),
    }
}

/// The authorization gate.
///
/// Stores are injected explicitly; the gate holds no mutable state and
/// may be shared across requests.
pub struct AuthGate {
    tokens: Arc<TokenService>,
    identities: Arc<dyn IdentityStore>,
    roles: Arc<dyn RoleStore>,
    departments: Arc<dyn DepartmentStore>,
}

impl AuthGate {
    /// Create a new gate over the given stores.
    pub fn new(
        tokens: Arc<TokenService>,
        identities: Arc<dyn IdentityStore>,
        roles: Arc<dyn RoleStore>,
        departments: Arc<dyn DepartmentStore>,
    ) -> Self {
        Self {
            tokens,
            identities,
            roles,
            departments,
        }
    }

    /// Authenticate a request without a permission requirement.
    ///
    /// Runs the pipeline up to `IdentityLoaded` and admits. Used by
    /// endpoints that need a valid session but no named permission
    /// (e.g. `GET /auth/me`).
    pub async fn authenticate(&self, authorization: Option<&str>) -> AuthResult<AuthContext> {
        let header = authorization.ok_or_else(|| {
            AuthError::Unauthenticated("missing authorization header".to_string())
        })?;
        let token = bearer_token(header)?;
        let identity_id = self.tokens.verify(token)?;

        // Reload the identity; the token asserts an id, nothing more.
        let identity = match self.identities.find(identity_id).await {
            Ok(identity) => identity,
            Err(IdentityError::NotFound) => {
                return Err(AuthError::Unauthenticated(
                    "identity no longer exists".to_string(),
                ))
            }
            Err(other) => return Err(other.into()),
        };
        if !identity.status.is_active() {
            return Err(AuthError::AccountDisabled);
        }

        // An identity referencing a vanished role is a data problem, not
        // a caller problem.
        let role = self.roles.role(identity.role_id).await.map_err(|_| {
            AuthError::Internal(format!(
                "identity {} references unknown role {}",
                identity.id, identity.role_id
            ))
        })?;
        let permissions = self.roles.permissions_of(role.id).await?;

        let department = match identity.department_id {
            Some(department_id) => self.departments.department(department_id).await.ok(),
            None => None,
        };

        debug!(identity = %identity.id, role = %role.slug, "request admitted");
        Ok(AuthContext {
            identity,
            role,
            department,
            permissions,
        })
    }

    /// Authenticate and enforce a permission requirement.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        requirement: &PermissionRequirement,
    ) -> AuthResult<AuthContext> {
        let context = self.authenticate(authorization).await?;
        context.require(requirement)?;
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_identity::{
        IdentityStatus, IdentityUpdate, MemoryDepartmentStore, MemoryIdentityStore, NewIdentity,
    };
    use depot_rbac::{permission::names, MemoryRoleStore, ROOT_ROLE_SLUG};

    struct Fixture {
        gate: AuthGate,
        tokens: Arc<TokenService>,
        identities: Arc<MemoryIdentityStore>,
        roles: Arc<MemoryRoleStore>,
    }

    async fn fixture() -> Fixture {
        let tokens = Arc::new(
            TokenService::with_secret("gate-test-secret-with-enough-length").unwrap(),
        );
        let identities = Arc::new(MemoryIdentityStore::new());
        let roles = Arc::new(MemoryRoleStore::with_defaults());
        let departments = Arc::new(MemoryDepartmentStore::new());
        let gate = AuthGate::new(
            Arc::clone(&tokens),
            Arc::clone(&identities) as Arc<dyn IdentityStore>,
            Arc::clone(&roles) as Arc<dyn RoleStore>,
            departments as Arc<dyn DepartmentStore>,
        );
        Fixture {
            gate,
            tokens,
            identities,
            roles,
        }
    }

    async fn admitted_identity(f: &Fixture, role_slug: &str) -> (Identity, String) {
        let role = f.roles.role_by_slug(role_slug).await.unwrap();
        let identity = f
            .identities
            .create(NewIdentity::new(
                "Gate User",
                format!("{role_slug}@example.com"),
                "abcdef",
                role.id,
            ))
            .await
            .unwrap();
        let token = f.tokens.issue(identity.id).unwrap();
        (identity, format!("Bearer {token}"))
    }

    #[tokio::test]
    async fn test_missing_header() {
        let f = fixture().await;
        let result = f.gate.authenticate(None).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let f = fixture().await;
        for header in ["Basic abc", "Bearer", "Bearer ", "token-without-scheme"] {
            let result = f.gate.authenticate(Some(header)).await;
            assert!(
                matches!(result, Err(AuthError::Unauthenticated(_)) | Err(AuthError::TokenInvalid(_))),
                "header {header:?} was admitted"
            );
        }
    }

    #[tokio::test]
    async fn test_admission_exposes_context() {
        let f = fixture().await;
        let (identity, header) = admitted_identity(&f, ROOT_ROLE_SLUG).await;

        let ctx = f.gate.authenticate(Some(&header)).await.unwrap();
        assert_eq!(ctx.identity_id(), identity.id);
        assert!(ctx.has_permission(names::MANAGE_USERS));
        assert!(!ctx.is_self_scoped());
    }

    #[tokio::test]
    async fn test_permission_denied_names_requirement() {
        let f = fixture().await;
        let (_, header) = admitted_identity(&f, "contributor").await;

        let result = f
            .gate
            .authorize(
                Some(&header),
                &PermissionRequirement::single(names::MANAGE_USERS),
            )
            .await;

        match result {
            Err(AuthError::PermissionDenied { required }) => {
                assert_eq!(required, names::MANAGE_USERS)
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_any_requirement_admits_scoped_permission() {
        let f = fixture().await;
        let (_, header) = admitted_identity(&f, "contributor").await;

        let requirement =
            PermissionRequirement::any([names::MANAGE_DOCUMENTS, names::UPLOAD_DOCUMENTS]);
        assert!(f.gate.authorize(Some(&header), &requirement).await.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_account_fails_even_with_valid_token() {
        let f = fixture().await;
        let (identity, header) = admitted_identity(&f, "contributor").await;

        f.identities
            .update(
                identity.id,
                IdentityUpdate::new().status(IdentityStatus::Inactive),
            )
            .await
            .unwrap();

        let result = f.gate.authenticate(Some(&header)).await;
        assert!(matches!(result, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn test_deleted_identity_fails_unauthenticated() {
        let f = fixture().await;
        let (identity, header) = admitted_identity(&f, "contributor").await;

        f.identities.delete(identity.id).await.unwrap();

        let result = f.gate.authenticate(Some(&header)).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn test_grant_change_visible_on_next_request() {
        let f = fixture().await;
        let (_, header) = admitted_identity(&f, "reviewer").await;
        let reviewer = f.roles.role_by_slug("reviewer").await.unwrap();

        let requirement = PermissionRequirement::single(names::MANAGE_DOCUMENTS);
        assert!(f.gate.authorize(Some(&header), &requirement).await.is_err());

        f.roles
            .replace_permissions(
                reviewer.id,
                &[
                    depot_rbac::PermissionRef::name(names::APPROVE_DOCUMENTS),
                    depot_rbac::PermissionRef::name(names::MANAGE_DOCUMENTS),
                ],
            )
            .await
            .unwrap();

        // Same token, new grants: takes effect without reissue.
        assert!(f.gate.authorize(Some(&header), &requirement).await.is_ok());
    }
}
