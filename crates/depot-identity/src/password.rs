//! Password hashing
//!
//! One-way hashing for identity secrets using bcrypt. Plaintext secrets
//! exist only transiently in creation/update requests; everything stored
//! or compared goes through [`PasswordHash`].

use crate::store::IdentityError;

/// Minimum accepted secret length.
pub const MIN_SECRET_LEN: usize = 6;

/// A one-way bcrypt hash of a password secret.
///
/// The inner string is the bcrypt-encoded hash (cost + salt + digest).
/// `Debug` redacts it; the type has no serde derives so it can never
/// leak into a serialized response.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[REDACTED]").finish()
    }
}

impl PasswordHash {
    /// Hash a plaintext secret.
    ///
    /// Fails with [`IdentityError::Validation`] when the secret is
    /// shorter than [`MIN_SECRET_LEN`].
    pub fn new(plaintext: &str) -> Result<Self, IdentityError> {
        if plaintext.len() < MIN_SECRET_LEN {
            return Err(IdentityError::Validation(format!(
                "secret must be at least {MIN_SECRET_LEN} characters"
            )));
        }
        let hashed = bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
            .map_err(|e| IdentityError::Internal(format!("password hashing failed: {e}")))?;
        Ok(Self(hashed))
    }

    /// Wrap an already-encoded bcrypt hash (e.g. loaded from storage).
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Check a plaintext secret against this hash.
    ///
    /// A malformed stored hash verifies as `false` rather than erroring;
    /// the caller cannot do anything more useful with it.
    pub fn verify(&self, plaintext: &str) -> bool {
        bcrypt::verify(plaintext, &self.0).unwrap_or(false)
    }

    /// The encoded hash string, for persistence.
    pub fn as_encoded(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordHash::new("abcdef").unwrap();
        assert!(hash.verify("abcdef"));
        assert!(!hash.verify("abcdeg"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = PasswordHash::new("abc");
        assert!(matches!(result, Err(IdentityError::Validation(_))));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = PasswordHash::new("abcdef").unwrap();
        let b = PasswordHash::new("abcdef").unwrap();
        assert_ne!(a.as_encoded(), b.as_encoded());
    }

    #[test]
    fn test_debug_redacts() {
        let hash = PasswordHash::new("abcdef").unwrap();
        let rendered = format!("{hash:?}");
        assert!(!rendered.contains(hash.as_encoded()));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_malformed_stored_hash_never_verifies() {
        let hash = PasswordHash::from_encoded("not-a-bcrypt-hash");
        assert!(!hash.verify("anything"));
    }
}
