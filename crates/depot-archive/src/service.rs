//! Document service
//!
//! The handler-facing operations on document records. Callers arrive
//! here already admitted by the authorization gate; this layer enforces
//! what the gate cannot see: ownership scoping against the loaded
//! record, lifecycle transition guards, and the create-validate-fail-
//! cleanup ordering around the stored file.

use std::sync::Arc;

use tracing::{error, warn};
use uuid::Uuid;

use depot_auth::AuthContext;
use depot_identity::{Page, PageRequest};
use depot_rbac::{permission::names, PermissionRequirement};

use crate::error::{ArchiveError, ArchiveResult};
use crate::files::FileStore;
use crate::record::{DocumentRecord, DocumentUpdate, NewDocument};
use crate::scope::{AccessScope, ScopePolicy};
use crate::status::{DocumentStatus, LifecycleEvent, RejectDisposition};
use crate::store::{DocumentQuery, DocumentStore};

/// Policy knobs for the archive.
#[derive(Debug, Clone)]
pub struct ArchivePolicy {
    /// Where rejected records land.
    pub reject_to: RejectDisposition,
    /// How an ownership-scope miss on an existing record answers.
    pub scope_miss: ScopePolicy,
    /// Whether an upload may start at pending-review when the uploader
    /// asks for it.
    pub allow_submit_on_create: bool,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self {
            reject_to: RejectDisposition::Rejected,
            scope_miss: ScopePolicy::Forbidden,
            allow_submit_on_create: true,
        }
    }
}

/// Listing parameters as they arrive from the transport layer.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Restrict to a status.
    pub status: Option<DocumentStatus>,
    /// Restrict to a department.
    pub department_id: Option<Uuid>,
    /// Case-insensitive substring match against title or author.
    pub search: Option<String>,
    /// Page window.
    pub page: PageRequest,
}

/// Outcome of a soft-delete.
///
/// File removal is attempted as part of the transition but its failure
/// does not block the status change; the outcome reports what happened
/// so the caller can surface it.
#[derive(Debug, Clone)]
pub struct DeletionReport {
    /// The archived record.
    pub record: DocumentRecord,
    /// Whether the stored file was removed.
    pub file_removed: bool,
    /// The removal failure, when there was one.
    pub file_error: Option<String>,
}

/// Document record operations.
pub struct ArchiveService {
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    policy: ArchivePolicy,
}

impl ArchiveService {
    /// Create a new archive service.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
        policy: ArchivePolicy,
    ) -> Self {
        Self {
            documents,
            files,
            policy,
        }
    }

    fn require(&self, ctx: &AuthContext, requirement: &PermissionRequirement) -> ArchiveResult<()> {
        if requirement.satisfied_by(&ctx.permissions) {
            Ok(())
        } else {
            Err(ArchiveError::PermissionDenied {
                required: requirement.to_string(),
            })
        }
    }

    /// Load a record and apply the caller's ownership scope.
    async fn load_scoped(&self, ctx: &AuthContext, id: Uuid) -> ArchiveResult<DocumentRecord> {
        let record = self.documents.get(id).await?;
        let scope = AccessScope::for_caller(ctx);
        if !scope.allows(&record) {
            return Err(self.policy.scope_miss.deny());
        }
        Ok(record)
    }

    /// Remove an uploaded file during failure cleanup, reporting but
    /// not propagating a removal failure.
    async fn cleanup_file(&self, path: &str) {
        if let Err(err) = self.files.remove(path).await {
            error!(path, %err, "failed to clean up file after aborted create");
        }
    }

    /// Create a document record from an already-stored upload.
    ///
    /// Requires `upload_documents` (or the broader `manage_documents`).
    /// The file is written by the upload stage before metadata reaches
    /// this call, so a validation failure removes it again before the
    /// error returns; a caller never pays twice for a rejected upload.
    ///
    /// The record starts at draft, or at pending-review when the
    /// uploader asks and policy allows.
    pub async fn create(
        &self,
        ctx: &AuthContext,
        new: NewDocument,
    ) -> ArchiveResult<DocumentRecord> {
        self.require(
            ctx,
            &PermissionRequirement::any([names::MANAGE_DOCUMENTS, names::UPLOAD_DOCUMENTS]),
        )?;

        if new.title.trim().is_empty() || new.author.trim().is_empty() {
            self.cleanup_file(&new.file.path).await;
            return Err(ArchiveError::Validation(
                "title and author are required".to_string(),
            ));
        }

        let status = if new.submit_for_review && self.policy.allow_submit_on_create {
            DocumentStatus::PendingReview
        } else {
            DocumentStatus::Draft
        };

        let file_path = new.file.path.clone();
        let record = DocumentRecord::new(new, ctx.identity_id(), status);
        match self.documents.insert(record).await {
            Ok(record) => Ok(record),
            Err(err) => {
                self.cleanup_file(&file_path).await;
                Err(err)
            }
        }
    }

    /// Load a single record under the caller's scope.
    pub async fn get(&self, ctx: &AuthContext, id: Uuid) -> ArchiveResult<DocumentRecord> {
        self.load_scoped(ctx, id).await
    }

    /// List records under the caller's scope.
    ///
    /// The scope is part of the query predicate, so totals and page
    /// counts are computed over the visible set only.
    pub async fn list(
        &self,
        ctx: &AuthContext,
        request: ListRequest,
    ) -> ArchiveResult<Page<DocumentRecord>> {
        let query = DocumentQuery {
            scope: AccessScope::for_caller(ctx),
            status: request.status,
            department_id: request.department_id,
            search: request.search,
            page: request.page,
        };
        self.documents.list(&query).await
    }

    /// Edit record metadata.
    ///
    /// Metadata edits are independent of lifecycle status; ownership
    /// scoping still applies.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        update: DocumentUpdate,
    ) -> ArchiveResult<DocumentRecord> {
        self.load_scoped(ctx, id).await?;
        self.documents.update(id, update).await
    }

    /// Approve a submission, publishing it.
    ///
    /// Requires `approve_documents`. Only draft and pending-review
    /// records can be approved; the transition is guarded by a
    /// compare-and-set, so of two concurrent reviewer decisions exactly
    /// one lands and the other conflicts.
    pub async fn approve(&self, ctx: &AuthContext, id: Uuid) -> ArchiveResult<DocumentRecord> {
        self.require(ctx, &PermissionRequirement::single(names::APPROVE_DOCUMENTS))?;

        let record = self.documents.get(id).await?;
        let next = record
            .status
            .apply(LifecycleEvent::Approve, self.policy.reject_to)?;
        self.documents
            .set_status(id, record.status, next, None)
            .await
    }

    /// Reject a submission.
    ///
    /// Requires `approve_documents`. The disposition (rejected vs.
    /// archived) follows policy; an optional reviewer note is persisted
    /// on the record, never discarded.
    pub async fn reject(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        note: Option<String>,
    ) -> ArchiveResult<DocumentRecord> {
        self.require(ctx, &PermissionRequirement::single(names::APPROVE_DOCUMENTS))?;

        let record = self.documents.get(id).await?;
        let next = record
            .status
            .apply(LifecycleEvent::Reject, self.policy.reject_to)?;
        self.documents
            .set_status(id, record.status, next, note)
            .await
    }

    /// Soft-delete a record: archive it and remove the stored file.
    ///
    /// Allowed for holders of `manage_documents`, and for a self-scoped
    /// owner deleting their own record. The status change is the source
    /// of truth; a file-removal failure is reported in the
    /// [`DeletionReport`] (and logged) but does not block it.
    pub async fn soft_delete(
        &self,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ArchiveResult<DeletionReport> {
        let record = self.load_scoped(ctx, id).await?;

        let owns = record.uploaded_by == ctx.identity_id();
        if !ctx.has_permission(names::MANAGE_DOCUMENTS) && !(ctx.is_self_scoped() && owns) {
            return Err(ArchiveError::PermissionDenied {
                required: names::MANAGE_DOCUMENTS.to_string(),
            });
        }

        let next = record
            .status
            .apply(LifecycleEvent::SoftDelete, self.policy.reject_to)?;
        let archived = self
            .documents
            .set_status(id, record.status, next, None)
            .await?;

        let (file_removed, file_error) = match self.files.remove(&archived.file.path).await {
            Ok(()) => (true, None),
            Err(err) => {
                warn!(document = %archived.id, path = %archived.file.path, %err,
                    "stored file could not be removed during soft-delete");
                (false, Some(err.to_string()))
            }
        };

        Ok(DeletionReport {
            record: archived,
            file_removed,
            file_error,
        })
    }
}
