//! Session token issuing and verification
//!
//! This module wraps the jsonwebtoken crate for Depot's single token
//! shape: an HS256-signed assertion of an identity id with a bounded
//! lifetime. Verification checks signature and expiry only; account
//! status is re-checked by the gate after reloading the identity.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::claims::SessionClaims;
use crate::error::{AuthError, AuthResult};

/// Token configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for HMAC signing.
    pub secret: String,

    /// Token issuer.
    pub issuer: String,

    /// Session lifetime.
    pub lifetime: Duration,
}

impl TokenConfig {
    /// Create a configuration with the default issuer and 24-hour
    /// lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "depot".to_string(),
            lifetime: Duration::hours(24),
        }
    }

    /// Override the session lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }
}

/// Issues and verifies session tokens.
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.config.issuer)
            .field("lifetime", &self.config.lifetime)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    /// Create a new token service.
    ///
    /// Fails with [`AuthError::Configuration`] when the secret is empty.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::Configuration(
                "token secret must not be empty".to_string(),
            ));
        }
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Create with a secret and default configuration.
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::new(TokenConfig::new(secret))
    }

    /// Issue a signed session token for an identity.
    ///
    /// The token carries only the identity id and timestamps; role and
    /// permissions are resolved fresh on every verification.
    pub fn issue(&self, identity_id: Uuid) -> AuthResult<String> {
        let claims = SessionClaims::new(identity_id, &self.config.issuer, self.config.lifetime);
        self.encode_claims(&claims)
    }

    /// Encode prepared claims into a token string.
    pub fn encode_claims(&self, claims: &SessionClaims) -> AuthResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verify a token and return the asserted identity id.
    ///
    /// Checks signature, issuer, and expiry only. Does not check account
    /// status; the gate re-loads the identity for that.
    pub fn verify(&self, token: &str) -> AuthResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_aud = false;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AuthError::TokenInvalid("malformed token".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AuthError::TokenInvalid("invalid signature".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AuthError::TokenInvalid("invalid issuer".to_string())
                }
                _ => AuthError::TokenInvalid(e.to_string()),
            },
        )?;

        data.claims
            .identity_id()
            .ok_or_else(|| AuthError::TokenInvalid("subject is not an identity id".to_string()))
    }

    /// Get the configuration.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> String {
        "test-secret-key-for-session-signing-minimum-32-chars".to_string()
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        let identity_id = Uuid::now_v7();

        let token = service.issue(identity_id).unwrap();
        assert_eq!(service.verify(&token).unwrap(), identity_id);
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        let mut claims = SessionClaims::new(Uuid::now_v7(), "depot", Duration::hours(1));
        // Past the verifier's leeway.
        claims.exp = chrono::Utc::now().timestamp() - 3600;

        let token = service.encode_claims(&claims).unwrap();
        assert!(matches!(service.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        assert!(matches!(
            service.verify("not-a-token"),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_wrong_key_signature() {
        let issuer = TokenService::with_secret(test_secret()).unwrap();
        let other = TokenService::with_secret("a-completely-different-signing-secret").unwrap();

        let token = issuer.issue(Uuid::now_v7()).unwrap();
        assert!(matches!(
            other.verify(&token),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        let foreign = SessionClaims::new(Uuid::now_v7(), "someone-else", Duration::hours(1));
        let token = service.encode_claims(&foreign).unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_empty_secret_refused() {
        assert!(matches!(
            TokenService::with_secret(""),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_lifetime_is_24h() {
        let service = TokenService::with_secret(test_secret()).unwrap();
        assert_eq!(service.config().lifetime, Duration::hours(24));
    }
}
