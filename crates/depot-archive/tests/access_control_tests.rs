//! End-to-end access-control scenarios across the full stack:
//! token issue/verify, gate admission, ownership scoping, and the
//! document lifecycle, wired exactly as a deployment would wire them.

use std::sync::Arc;

use depot_archive::{
    ArchiveError, ArchivePolicy, ArchiveService, DocumentStatus, DocumentUpdate, FileStore,
    ListRequest, MemoryDocumentStore, MemoryFileStore, NewDocument, ScopePolicy, StoredFile,
};
use depot_auth::{
    AuthConfig, AuthContext, AuthError, AuthGate, AuthService, RegisterRequest, TokenService,
};
use depot_identity::{
    DepartmentStore, IdentityStatus, IdentityStore, IdentityUpdate, MemoryDepartmentStore,
    MemoryIdentityStore, NewIdentity,
};
use depot_rbac::{
    permission::names, MemoryRoleStore, PermissionRef, RoleStore, ROOT_ROLE_SLUG,
};

struct Stack {
    tokens: Arc<TokenService>,
    identities: Arc<MemoryIdentityStore>,
    roles: Arc<MemoryRoleStore>,
    gate: AuthGate,
    auth: AuthService,
    files: Arc<MemoryFileStore>,
    archive: ArchiveService,
}

fn stack_with_policy(policy: ArchivePolicy) -> Stack {
    let tokens = Arc::new(
        TokenService::with_secret("integration-test-secret-with-enough-length").unwrap(),
    );
    let identities = Arc::new(MemoryIdentityStore::new());
    let roles = Arc::new(MemoryRoleStore::with_defaults());
    let departments = Arc::new(MemoryDepartmentStore::new());
    let documents = Arc::new(MemoryDocumentStore::new());
    let files = Arc::new(MemoryFileStore::new());

    let gate = AuthGate::new(
        Arc::clone(&tokens),
        Arc::clone(&identities) as Arc<dyn IdentityStore>,
        Arc::clone(&roles) as Arc<dyn RoleStore>,
        Arc::clone(&departments) as Arc<dyn DepartmentStore>,
    );
    let auth = AuthService::new(
        Arc::clone(&tokens),
        Arc::clone(&identities) as Arc<dyn IdentityStore>,
        Arc::clone(&roles) as Arc<dyn RoleStore>,
        AuthConfig::default(),
    );
    let archive = ArchiveService::new(
        documents,
        Arc::clone(&files) as Arc<dyn FileStore>,
        policy,
    );

    Stack {
        tokens,
        identities,
        roles,
        gate,
        auth,
        files,
        archive,
    }
}

fn stack() -> Stack {
    stack_with_policy(ArchivePolicy::default())
}

impl Stack {
    /// Register a self-scoped contributor and admit it.
    async fn contributor(&self, name: &str, email: &str) -> (AuthContext, String) {
        let session = self
            .auth
            .register(RegisterRequest {
                name: name.into(),
                email: email.into(),
                secret: "abcdef".into(),
                personnel_id: None,
                department_id: None,
            })
            .await
            .unwrap();
        let header = format!("Bearer {}", session.token);
        let ctx = self.gate.authenticate(Some(&header)).await.unwrap();
        (ctx, header)
    }

    /// Create an identity on an arbitrary seeded role and admit it.
    async fn actor(&self, slug: &str, email: &str) -> AuthContext {
        let role = self.roles.role_by_slug(slug).await.unwrap();
        let identity = self
            .identities
            .create(NewIdentity::new("Actor", email, "abcdef", role.id))
            .await
            .unwrap();
        let header = format!("Bearer {}", self.tokens.issue(identity.id).unwrap());
        self.gate.authenticate(Some(&header)).await.unwrap()
    }

    /// Upload a document whose backing file is present in the store.
    async fn upload(&self, ctx: &AuthContext, title: &str, path: &str) -> depot_archive::DocumentRecord {
        self.files.put(path).await;
        self.archive
            .create(
                ctx,
                NewDocument::new(title, "Some Author", StoredFile::new(path, "file.pdf"))
                    .submitted_for_review(),
            )
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn registration_assigns_default_role_and_hides_secret() {
    let s = stack();
    let session = s
        .auth
        .register(RegisterRequest {
            name: "Alice".into(),
            email: "alice@x.com".into(),
            secret: "abcdef".into(),
            personnel_id: None,
            department_id: None,
        })
        .await
        .unwrap();

    let contributor = s.roles.role_by_slug("contributor").await.unwrap();
    assert_eq!(session.identity.role_id, contributor.id);

    // The public identity type carries no secret material at all.
    let rendered = serde_json::to_string(&session.identity).unwrap();
    assert!(!rendered.contains("abcdef"));
    assert!(!rendered.contains("password"));
}

#[tokio::test]
async fn login_with_wrong_secret_is_unauthorized() {
    let s = stack();
    s.contributor("Alice", "alice@x.com").await;

    let err = s.auth.login("alice@x.com", "wrong-secret").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn disabling_an_account_invalidates_live_sessions() {
    let s = stack();
    let (ctx, header) = s.contributor("Alice", "alice@x.com").await;

    // Admin flips the account to inactive while Alice's token is still
    // within its lifetime.
    s.identities
        .update(
            ctx.identity_id(),
            IdentityUpdate::new().status(IdentityStatus::Inactive),
        )
        .await
        .unwrap();

    let err = s.gate.authenticate(Some(&header)).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountDisabled));
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn ownership_boundary_holds_for_every_operation() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let (bob, _) = s.contributor("Bob", "bob@x.com").await;

    let record = s.upload(&alice, "Alice's Thesis", "uploads/thesis.pdf").await;

    // Read, update, delete: every path refuses Bob.
    let read = s.archive.get(&bob, record.id).await;
    assert!(matches!(read, Err(ArchiveError::Forbidden(_))));

    let update = s
        .archive
        .update(&bob, record.id, DocumentUpdate::new().title("Hijacked"))
        .await;
    assert!(matches!(update, Err(ArchiveError::Forbidden(_))));

    let delete = s.archive.soft_delete(&bob, record.id).await;
    assert!(matches!(delete, Err(ArchiveError::Forbidden(_))));

    // And Bob's listings never count Alice's records.
    let page = s.archive.list(&bob, ListRequest::default()).await.unwrap();
    assert_eq!(page.total_items, 0);

    let mine = s.archive.list(&alice, ListRequest::default()).await.unwrap();
    assert_eq!(mine.total_items, 1);
}

#[tokio::test]
async fn strict_policy_hides_existence() {
    let s = stack_with_policy(ArchivePolicy {
        scope_miss: ScopePolicy::NotFound,
        ..ArchivePolicy::default()
    });
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let (bob, _) = s.contributor("Bob", "bob@x.com").await;

    let record = s.upload(&alice, "Alice's Thesis", "uploads/thesis.pdf").await;

    let read = s.archive.get(&bob, record.id).await;
    assert!(matches!(read, Err(ArchiveError::NotFound)));
}

#[tokio::test]
async fn approve_publishes_once_and_only_once() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let reviewer = s.actor("reviewer", "rev@x.com").await;

    let record = s.upload(&alice, "Pending Work", "uploads/pending.pdf").await;
    assert_eq!(record.status, DocumentStatus::PendingReview);

    let published = s.archive.approve(&reviewer, record.id).await.unwrap();
    assert_eq!(published.status, DocumentStatus::Published);

    // No guard path is defined out of published.
    let again = s.archive.approve(&reviewer, record.id).await;
    assert!(matches!(
        again,
        Err(ArchiveError::InvalidTransition { from: DocumentStatus::Published, .. })
    ));
}

#[tokio::test]
async fn approve_requires_the_permission() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let record = s.upload(&alice, "Pending Work", "uploads/pending.pdf").await;

    // Contributors hold upload_documents but not approve_documents.
    let err = s.archive.approve(&alice, record.id).await.unwrap_err();
    match err {
        ArchiveError::PermissionDenied { required } => {
            assert_eq!(required, names::APPROVE_DOCUMENTS)
        }
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
}

#[tokio::test]
async fn reject_persists_the_note() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let reviewer = s.actor("reviewer", "rev@x.com").await;

    let record = s.upload(&alice, "Needs Work", "uploads/needs-work.pdf").await;
    let rejected = s
        .archive
        .reject(&reviewer, record.id, Some("missing chapter 3".into()))
        .await
        .unwrap();

    assert_eq!(rejected.status, DocumentStatus::Rejected);
    assert_eq!(rejected.review_note.as_deref(), Some("missing chapter 3"));
}

#[tokio::test]
async fn legacy_disposition_archives_rejections() {
    let s = stack_with_policy(ArchivePolicy {
        reject_to: depot_archive::RejectDisposition::Archived,
        ..ArchivePolicy::default()
    });
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let reviewer = s.actor("reviewer", "rev@x.com").await;

    let record = s.upload(&alice, "Old School", "uploads/old.pdf").await;
    let rejected = s.archive.reject(&reviewer, record.id, None).await.unwrap();
    assert_eq!(rejected.status, DocumentStatus::Archived);
}

#[tokio::test]
async fn owner_soft_delete_archives_and_removes_file() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;

    let record = s.upload(&alice, "Ephemeral", "uploads/ephemeral.pdf").await;
    assert!(s.files.exists("uploads/ephemeral.pdf").await);

    let report = s.archive.soft_delete(&alice, record.id).await.unwrap();
    assert_eq!(report.record.status, DocumentStatus::Archived);
    assert!(report.file_removed);
    assert!(report.file_error.is_none());
    assert!(!s.files.exists("uploads/ephemeral.pdf").await);
}

#[tokio::test]
async fn missing_file_does_not_block_soft_delete() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;

    let record = s.upload(&alice, "Ghost File", "uploads/ghost.pdf").await;
    // The file disappears out from under the record.
    s.files.remove("uploads/ghost.pdf").await.unwrap();

    let report = s.archive.soft_delete(&alice, record.id).await.unwrap();
    assert_eq!(report.record.status, DocumentStatus::Archived);
    assert!(!report.file_removed);
    assert!(report.file_error.is_some());
}

#[tokio::test]
async fn failed_create_cleans_up_the_stored_file() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;

    s.files.put("uploads/orphan.pdf").await;
    let result = s
        .archive
        .create(
            &alice,
            NewDocument::new("", "", StoredFile::new("uploads/orphan.pdf", "orphan.pdf")),
        )
        .await;

    assert!(matches!(result, Err(ArchiveError::Validation(_))));
    // The create-validate-fail-cleanup ordering removed the upload.
    assert!(!s.files.exists("uploads/orphan.pdf").await);
}

#[tokio::test]
async fn unprivileged_upload_is_refused_before_anything_happens() {
    let s = stack();
    // Reviewers hold approve_documents only.
    let reviewer = s.actor("reviewer", "rev@x.com").await;

    let result = s
        .archive
        .create(
            &reviewer,
            NewDocument::new("T", "A", StoredFile::new("uploads/x.pdf", "x.pdf")),
        )
        .await;
    assert!(matches!(result, Err(ArchiveError::PermissionDenied { .. })));
}

#[tokio::test]
async fn admin_sees_everything_unscoped() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let (bob, _) = s.contributor("Bob", "bob@x.com").await;
    let admin = s.actor(ROOT_ROLE_SLUG, "root@x.com").await;

    s.upload(&alice, "Alice One", "uploads/a1.pdf").await;
    s.upload(&bob, "Bob One", "uploads/b1.pdf").await;

    let page = s.archive.list(&admin, ListRequest::default()).await.unwrap();
    assert_eq!(page.total_items, 2);

    // Search narrows the same scoped query.
    let found = s
        .archive
        .list(
            &admin,
            ListRequest {
                search: Some("bob".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.total_items, 1);
}

#[tokio::test]
async fn concurrent_permission_replacement_never_mixes() {
    let s = stack();
    let reviewer = s.roles.role_by_slug("reviewer").await.unwrap();

    let a = [
        PermissionRef::name(names::MANAGE_USERS),
        PermissionRef::name(names::MANAGE_ROLES),
    ];
    let b = [
        PermissionRef::name(names::MANAGE_ROLES),
        PermissionRef::name(names::MANAGE_DOCUMENTS),
    ];

    let roles_a = Arc::clone(&s.roles);
    let roles_b = Arc::clone(&s.roles);
    let id = reviewer.id;
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { roles_a.replace_permissions(id, &a).await }),
        tokio::spawn(async move { roles_b.replace_permissions(id, &b).await }),
    );
    ra.unwrap().unwrap();
    rb.unwrap().unwrap();

    let result = s.roles.permissions_of(reviewer.id).await.unwrap();
    let names_after = result.names();
    let expect_a = vec![
        names::MANAGE_ROLES.to_string(),
        names::MANAGE_USERS.to_string(),
    ];
    let expect_b = vec![
        names::MANAGE_DOCUMENTS.to_string(),
        names::MANAGE_ROLES.to_string(),
    ];
    assert!(
        names_after == expect_a || names_after == expect_b,
        "grant set is a mixture: {names_after:?}"
    );
}

#[tokio::test]
async fn permission_change_applies_without_token_reissue() {
    let s = stack();
    let (_, header) = s.contributor("Alice", "alice@x.com").await;
    let contributor = s.roles.role_by_slug("contributor").await.unwrap();

    // Grant approve_documents to contributors mid-session.
    s.roles
        .replace_permissions(
            contributor.id,
            &[
                PermissionRef::name(names::UPLOAD_DOCUMENTS),
                PermissionRef::name(names::APPROVE_DOCUMENTS),
            ],
        )
        .await
        .unwrap();

    // The very next admission with the same token sees the new grant.
    let ctx = s.gate.authenticate(Some(&header)).await.unwrap();
    assert!(ctx.has_permission(names::APPROVE_DOCUMENTS));
}

#[tokio::test]
async fn metadata_edits_are_independent_of_status() {
    let s = stack();
    let (alice, _) = s.contributor("Alice", "alice@x.com").await;
    let reviewer = s.actor("reviewer", "rev@x.com").await;

    let record = s.upload(&alice, "Stable Title", "uploads/stable.pdf").await;
    s.archive.approve(&reviewer, record.id).await.unwrap();

    // Published records still accept metadata edits from their owner.
    let updated = s
        .archive
        .update(&alice, record.id, DocumentUpdate::new().year(Some(2026)))
        .await
        .unwrap();
    assert_eq!(updated.year, Some(2026));
    assert_eq!(updated.status, DocumentStatus::Published);
}
