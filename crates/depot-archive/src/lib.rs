//! # Depot Archive
//!
//! Document records and their lifecycle state machine for the Depot
//! platform.
//!
//! ## Overview
//!
//! The depot-archive crate handles:
//! - **Records**: the governed resource (title, abstract, author, file
//!   reference, uploader, optional department scope, status)
//! - **Lifecycle**: the draft → pending-review → published / archived /
//!   rejected state machine, with permission-gated transitions
//! - **Ownership scoping**: self-scoped callers only see and mutate
//!   records they uploaded, in queries and single-record access alike
//! - **Storage seams**: [`DocumentStore`] and [`FileStore`] traits with
//!   in-memory implementations
//!
//! ## Control flow
//!
//! Requests reach [`ArchiveService`] already admitted by the
//! depot-auth gate; the service applies ownership scoping against the
//! loaded record, checks the lifecycle guard for transitions, and keeps
//! the stored file consistent with the record (cleanup on failed
//! create, removal on soft-delete).
//!
//! ## Concurrency
//!
//! Status transitions re-read the current status immediately before
//! writing and fail with a conflict when it moved underneath the
//! caller, so two concurrent approve/reject calls cannot both succeed
//! against a stale state.

pub mod error;
pub mod files;
pub mod record;
pub mod scope;
pub mod service;
pub mod status;
pub mod store;

// Re-export main types
pub use error::{ArchiveError, ArchiveResult};
pub use files::{FileStore, FileStoreError, FileStoreResult, MemoryFileStore};
pub use record::{DocumentRecord, DocumentUpdate, NewDocument, StoredFile};
pub use scope::{AccessScope, ScopePolicy};
pub use service::{ArchivePolicy, ArchiveService, DeletionReport, ListRequest};
pub use status::{DocumentStatus, LifecycleEvent, RejectDisposition};
pub use store::{DocumentQuery, DocumentStore, MemoryDocumentStore};
