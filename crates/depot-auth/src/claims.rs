//! Session token claims
//!
//! The session token asserts one thing: which identity the caller is,
//! and until when. Role and permissions are deliberately NOT embedded;
//! they are re-resolved from the stores on every request, so a grant
//! change takes effect on the very next call without reissuing tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a Depot session token (RFC 7519 subset).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (identity ID).
    pub sub: String,

    /// Issuer.
    pub iss: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Not before (Unix timestamp).
    pub nbf: i64,

    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

impl SessionClaims {
    /// Create claims for an identity.
    ///
    /// # Arguments
    ///
    /// * `identity_id` - The identity this session asserts
    /// * `issuer` - Token issuer string
    /// * `lifetime` - Validity duration
    pub fn new(identity_id: Uuid, issuer: impl Into<String>, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: identity_id.to_string(),
            iss: issuer.into(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Get the identity ID as a UUID.
    pub fn identity_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get the expiration as a DateTime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}
