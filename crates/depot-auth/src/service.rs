//! Authentication surface
//!
//! Self-service session operations: login, registration, the current
//! caller's profile, and secret changes. Admin-side identity management
//! lives in [`crate::directory`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use depot_identity::{Identity, IdentityStore, IdentityUpdate, NewIdentity};
use depot_rbac::{RoleStore, DEFAULT_ROLE_SLUG};

use crate::error::{AuthError, AuthResult};
use crate::gate::AuthContext;
use crate::token::TokenService;

/// Authentication service configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Slug of the role assigned to public self-registrations.
    pub default_role_slug: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_role_slug: DEFAULT_ROLE_SLUG.to_string(),
        }
    }
}

/// An issued session: the signed token plus the identity it asserts.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// The signed session token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    /// The authenticated identity (public view).
    pub identity: Identity,
}

/// Registration input.
///
/// There is deliberately no role field: registration always assigns the
/// configured default role server-side, so privilege escalation through
/// this endpoint is unrepresentable.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext secret.
    pub secret: String,
    /// Optional external personnel id.
    #[serde(default)]
    pub personnel_id: Option<String>,
    /// Optional department scope.
    #[serde(default)]
    pub department_id: Option<Uuid>,
}

/// The current caller with resolved permissions, for `GET /auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// The caller's identity.
    pub identity: Identity,
    /// Permission names granted through the caller's role.
    pub permissions: Vec<String>,
}

/// Self-service profile mutation; name and personnel id only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// Set or clear the personnel id.
    pub personnel_id: Option<Option<String>>,
}

/// Authentication service.
pub struct AuthService {
    tokens: Arc<TokenService>,
    identities: Arc<dyn IdentityStore>,
    roles: Arc<dyn RoleStore>,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new authentication service.
    pub fn new(
        tokens: Arc<TokenService>,
        identities: Arc<dyn IdentityStore>,
        roles: Arc<dyn RoleStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            tokens,
            identities,
            roles,
            config,
        }
    }

    fn session_for(&self, identity: Identity) -> AuthResult<Session> {
        let token = self.tokens.issue(identity.id)?;
        Ok(Session {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.config().lifetime.num_seconds(),
            identity,
        })
    }

    /// Authenticate with email and secret, returning a fresh session.
    ///
    /// Unknown email and wrong secret both fail with
    /// [`AuthError::InvalidCredentials`]; a disabled account fails with
    /// [`AuthError::AccountDisabled`].
    pub async fn login(&self, email: &str, secret: &str) -> AuthResult<Session> {
        let identity = self.identities.verify_credentials(email, secret).await?;
        self.session_for(identity)
    }

    /// Register a new identity and log it in.
    ///
    /// The default role is resolved server-side; a missing default role
    /// is a configuration error, not a caller error.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<Session> {
        if request.name.trim().is_empty() {
            return Err(AuthError::Validation("name must not be empty".into()));
        }

        let role = self
            .roles
            .role_by_slug(&self.config.default_role_slug)
            .await
            .map_err(|_| {
                AuthError::Configuration(format!(
                    "default role '{}' is not seeded",
                    self.config.default_role_slug
                ))
            })?;

        let mut new = NewIdentity::new(request.name, request.email, request.secret, role.id);
        new.personnel_id = request.personnel_id;
        new.department_id = request.department_id;

        let identity = self.identities.create(new).await?;
        self.session_for(identity)
    }

    /// The current caller with resolved permission names.
    pub fn me(&self, ctx: &AuthContext) -> Profile {
        Profile {
            identity: ctx.identity.clone(),
            permissions: ctx.permissions.names(),
        }
    }

    /// Update the caller's own profile (name, personnel id).
    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        update: ProfileUpdate,
    ) -> AuthResult<Identity> {
        let mut identity_update = IdentityUpdate::new();
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(AuthError::Validation("name must not be empty".into()));
            }
            identity_update.name = Some(name);
        }
        identity_update.personnel_id = update.personnel_id;

        Ok(self
            .identities
            .update(ctx.identity_id(), identity_update)
            .await?)
    }

    /// Change the caller's secret after re-verifying the current one.
    ///
    /// Previously issued tokens remain valid until they expire; there is
    /// no revocation.
    pub async fn change_secret(
        &self,
        ctx: &AuthContext,
        current: &str,
        new: &str,
    ) -> AuthResult<()> {
        let credentials = self
            .identities
            .find_with_secret(&ctx.identity.email)
            .await?;
        if !credentials.matches(current) {
            return Err(AuthError::Validation(
                "current secret is incorrect".to_string(),
            ));
        }
        self.identities.change_secret(ctx.identity_id(), new).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_identity::{DepartmentStore, MemoryDepartmentStore, MemoryIdentityStore};
    use depot_rbac::MemoryRoleStore;

    fn service() -> (AuthService, crate::gate::AuthGate) {
        let tokens = Arc::new(
            TokenService::with_secret("service-test-secret-with-enough-length").unwrap(),
        );
        let identities: Arc<MemoryIdentityStore> = Arc::new(MemoryIdentityStore::new());
        let roles = Arc::new(MemoryRoleStore::with_defaults());
        let departments = Arc::new(MemoryDepartmentStore::new());

        let service = AuthService::new(
            Arc::clone(&tokens),
            Arc::clone(&identities) as Arc<dyn IdentityStore>,
            Arc::clone(&roles) as Arc<dyn RoleStore>,
            AuthConfig::default(),
        );
        let gate = crate::gate::AuthGate::new(
            tokens,
            identities as Arc<dyn IdentityStore>,
            roles as Arc<dyn RoleStore>,
            departments as Arc<dyn DepartmentStore>,
        );
        (service, gate)
    }

    fn register_alice() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".into(),
            email: "alice@x.com".into(),
            secret: "abcdef".into(),
            personnel_id: None,
            department_id: None,
        }
    }

    #[tokio::test]
    async fn test_register_assigns_default_role_and_logs_in() {
        let (service, gate) = service();
        let session = service.register(register_alice()).await.unwrap();

        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.expires_in, 24 * 3600);

        let header = format!("Bearer {}", session.token);
        let ctx = gate.authenticate(Some(&header)).await.unwrap();
        assert_eq!(ctx.role.slug, DEFAULT_ROLE_SLUG);
        assert!(ctx.is_self_scoped());
    }

    #[tokio::test]
    async fn test_registration_response_has_no_secret_material() {
        let (service, _) = service();
        let session = service.register(register_alice()).await.unwrap();

        let json = serde_json::to_value(&session).unwrap();
        let rendered = json.to_string();
        assert!(!rendered.contains("abcdef"));
        assert!(!rendered.contains("password"));
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (service, _) = service();
        service.register(register_alice()).await.unwrap();

        let result = service.register(register_alice()).await;
        assert!(matches!(result, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_secret() {
        let (service, _) = service();
        service.register(register_alice()).await.unwrap();

        let result = service.login("alice@x.com", "wrong!").await;
        match result {
            Err(err @ AuthError::InvalidCredentials) => assert_eq!(err.status_code(), 401),
            other => panic!("expected InvalidCredentials, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let (service, gate) = service();
        let registered = service.register(register_alice()).await.unwrap();

        let session = service.login("alice@x.com", "abcdef").await.unwrap();
        assert_eq!(session.identity.id, registered.identity.id);

        let header = format!("Bearer {}", session.token);
        let ctx = gate.authenticate(Some(&header)).await.unwrap();
        assert_eq!(ctx.identity_id(), registered.identity.id);
    }

    #[tokio::test]
    async fn test_change_secret_requires_current() {
        let (service, gate) = service();
        let session = service.register(register_alice()).await.unwrap();
        let header = format!("Bearer {}", session.token);
        let ctx = gate.authenticate(Some(&header)).await.unwrap();

        let wrong = service.change_secret(&ctx, "nope!!", "newsecret").await;
        assert!(matches!(wrong, Err(AuthError::Validation(_))));

        service
            .change_secret(&ctx, "abcdef", "newsecret")
            .await
            .unwrap();
        assert!(service.login("alice@x.com", "abcdef").await.is_err());
        assert!(service.login("alice@x.com", "newsecret").await.is_ok());

        // The old token keeps working until expiry; no revocation.
        assert!(gate.authenticate(Some(&header)).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let (service, gate) = service();
        let session = service.register(register_alice()).await.unwrap();
        let header = format!("Bearer {}", session.token);
        let ctx = gate.authenticate(Some(&header)).await.unwrap();

        let updated = service
            .update_profile(
                &ctx,
                ProfileUpdate {
                    name: Some("Alice B.".into()),
                    personnel_id: Some(Some("NIP-7".into())),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Alice B.");
        assert_eq!(updated.personnel_id.as_deref(), Some("NIP-7"));
    }

    #[tokio::test]
    async fn test_me_lists_permissions() {
        let (service, gate) = service();
        let session = service.register(register_alice()).await.unwrap();
        let header = format!("Bearer {}", session.token);
        let ctx = gate.authenticate(Some(&header)).await.unwrap();

        let profile = service.me(&ctx);
        assert_eq!(profile.permissions, vec!["upload_documents"]);
    }
}
