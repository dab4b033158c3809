//! Document lifecycle state machine
//!
//! The status field of a document record moves along a fixed set of
//! paths; everything else is an invalid transition. The five-state
//! domain is canonical: pending-review is a real state, never silently
//! collapsed into draft.
//!
//! ```text
//!             ┌── approve ──▶ published
//! draft ──────┤
//! pending-review ─ reject ──▶ rejected (or archived, per policy)
//!
//! any ─────────── soft-delete ──▶ archived
//! ```
//!
//! Published and archived are terminal for normal flow: no transition
//! leads back to an editable state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ArchiveError, ArchiveResult};

/// Lifecycle status of a document record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    /// Freshly created, editable by the owner.
    Draft,
    /// Submitted and waiting for a reviewer.
    PendingReview,
    /// Approved and publicly visible.
    Published,
    /// Soft-deleted or retired; terminal.
    Archived,
    /// Turned down by a reviewer.
    Rejected,
}

impl DocumentStatus {
    /// Get the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending-review",
            Self::Published => "published",
            Self::Archived => "archived",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a status from string representation.
    ///
    /// Accepts the legacy space-separated spelling of pending-review.
    ///
    /// # Examples
    ///
    /// ```
    /// use depot_archive::DocumentStatus;
    ///
    /// assert_eq!(DocumentStatus::parse("draft"), Some(DocumentStatus::Draft));
    /// assert_eq!(
    ///     DocumentStatus::parse("pending review"),
    ///     Some(DocumentStatus::PendingReview)
    /// );
    /// assert_eq!(DocumentStatus::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending-review" | "pending review" | "pending" => Some(Self::PendingReview),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Check whether a reviewer decision (approve/reject) is still
    /// possible from this status.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, Self::Draft | Self::PendingReview)
    }

    /// Check whether this status is terminal for normal flow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Published | Self::Archived | Self::Rejected)
    }

    /// Apply a lifecycle event, returning the next status.
    ///
    /// Fails with [`ArchiveError::InvalidTransition`] when no path is
    /// defined for this status/event pair.
    pub fn apply(
        self,
        event: LifecycleEvent,
        reject_to: RejectDisposition,
    ) -> ArchiveResult<DocumentStatus> {
        match event {
            LifecycleEvent::Approve if self.is_reviewable() => Ok(Self::Published),
            LifecycleEvent::Reject if self.is_reviewable() => Ok(reject_to.status()),
            LifecycleEvent::SoftDelete => Ok(Self::Archived),
            LifecycleEvent::Approve | LifecycleEvent::Reject => {
                Err(ArchiveError::InvalidTransition { from: self, event })
            }
        }
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle event requested against a document record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleEvent {
    /// Reviewer approves the submission.
    Approve,
    /// Reviewer turns the submission down.
    Reject,
    /// Record is retired and its stored file removed.
    SoftDelete,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SoftDelete => "soft-delete",
        })
    }
}

/// Where a rejected record lands.
///
/// Installations that kept the legacy three-state storage enum map
/// rejections onto `archived`; the canonical disposition is `rejected`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectDisposition {
    /// Rejected records get the dedicated `rejected` status.
    Rejected,
    /// Rejected records are archived directly.
    Archived,
}

impl RejectDisposition {
    /// The status this disposition maps to.
    pub fn status(&self) -> DocumentStatus {
        match self {
            Self::Rejected => DocumentStatus::Rejected,
            Self::Archived => DocumentStatus::Archived,
        }
    }
}

impl Default for RejectDisposition {
    fn default() -> Self {
        Self::Rejected
    }
}
