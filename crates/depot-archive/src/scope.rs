//! Ownership scoping
//!
//! Roles flagged self-scoped only see and mutate records they uploaded.
//! The scope is derived once from the admitted caller and then injected
//! into queries and single-record checks, instead of re-deriving role
//! slugs per handler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use depot_auth::AuthContext;

use crate::error::ArchiveError;
use crate::record::DocumentRecord;

/// The effective record visibility for a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// The full record set, subject only to endpoint permissions.
    Unrestricted,
    /// Only records uploaded by the given identity.
    OwnedBy(Uuid),
}

impl AccessScope {
    /// Derive the scope for an admitted caller.
    pub fn for_caller(ctx: &AuthContext) -> Self {
        if ctx.is_self_scoped() {
            Self::OwnedBy(ctx.identity_id())
        } else {
            Self::Unrestricted
        }
    }

    /// Check whether a record is visible under this scope.
    pub fn allows(&self, record: &DocumentRecord) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::OwnedBy(owner) => record.uploaded_by == *owner,
        }
    }
}

/// Response shape for an ownership-scope miss on an existing record.
///
/// `Forbidden` keeps the miss distinct from a true 404; `NotFound`
/// unifies them so record existence is not leaked beyond authorized
/// owners. Both are valid; the choice is configuration, not code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScopePolicy {
    /// Scope misses answer 403 with an explicit message.
    Forbidden,
    /// Scope misses are indistinguishable from missing records.
    NotFound,
}

impl ScopePolicy {
    /// The error a scope miss produces under this policy.
    pub fn deny(&self) -> ArchiveError {
        match self {
            Self::Forbidden => {
                ArchiveError::Forbidden("you do not have access to this document".to_string())
            }
            Self::NotFound => ArchiveError::NotFound,
        }
    }
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self::Forbidden
    }
}
