//! Document store
//!
//! Storage seam for document records. Listing takes the ownership scope
//! as part of the query so pagination counts are computed over the
//! records the caller may actually see; status transitions go through a
//! compare-and-set so two concurrent reviewer decisions cannot both
//! land on a stale state.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use depot_identity::{Page, PageRequest};

use crate::error::{ArchiveError, ArchiveResult};
use crate::record::{DocumentRecord, DocumentUpdate};
use crate::scope::AccessScope;
use crate::status::DocumentStatus;

/// Filters for listing document records.
#[derive(Debug, Clone)]
pub struct DocumentQuery {
    /// The caller's effective visibility. Applied before counting.
    pub scope: AccessScope,
    /// Restrict to a status.
    pub status: Option<DocumentStatus>,
    /// Restrict to a department.
    pub department_id: Option<Uuid>,
    /// Case-insensitive substring match against title or author.
    pub search: Option<String>,
    /// Page window.
    pub page: PageRequest,
}

impl DocumentQuery {
    /// A query over everything visible to the given scope.
    pub fn scoped(scope: AccessScope) -> Self {
        Self {
            scope,
            status: None,
            department_id: None,
            search: None,
            page: PageRequest::default(),
        }
    }

    fn matches(&self, record: &DocumentRecord) -> bool {
        if !self.scope.allows(record) {
            return false;
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(department_id) = self.department_id {
            if record.department_id != Some(department_id) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !record.title.to_lowercase().contains(&needle)
                && !record.author.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Storage seam for document records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a freshly created record.
    async fn insert(&self, record: DocumentRecord) -> ArchiveResult<DocumentRecord>;

    /// Load a record by id.
    async fn get(&self, id: Uuid) -> ArchiveResult<DocumentRecord>;

    /// List records matching a query, with correct totals under the
    /// query's scope.
    async fn list(&self, query: &DocumentQuery) -> ArchiveResult<Page<DocumentRecord>>;

    /// Apply a metadata update. Status and uploader are untouchable by
    /// construction of [`DocumentUpdate`].
    async fn update(&self, id: Uuid, update: DocumentUpdate) -> ArchiveResult<DocumentRecord>;

    /// Transition a record's status with an optimistic guard.
    ///
    /// The record's current status is re-read immediately before the
    /// write; when it no longer equals `expected`, the transition fails
    /// with [`ArchiveError::Conflict`] and nothing changes. A reviewer
    /// note, when given, is persisted alongside the transition.
    async fn set_status(
        &self,
        id: Uuid,
        expected: DocumentStatus,
        next: DocumentStatus,
        note: Option<String>,
    ) -> ArchiveResult<DocumentRecord>;
}

/// In-memory document store.
pub struct MemoryDocumentStore {
    records: RwLock<HashMap<Uuid, DocumentRecord>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, record: DocumentRecord) -> ArchiveResult<DocumentRecord> {
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> ArchiveResult<DocumentRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ArchiveError::NotFound)
    }

    async fn list(&self, query: &DocumentQuery) -> ArchiveResult<Page<DocumentRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<DocumentRecord> = records
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        // Newest first, matching the listing endpoint.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::from_filtered(matching, query.page))
    }

    async fn update(&self, id: Uuid, update: DocumentUpdate) -> ArchiveResult<DocumentRecord> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(ArchiveError::NotFound)?;

        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(abstract_text) = update.abstract_text {
            record.abstract_text = abstract_text;
        }
        if let Some(author) = update.author {
            record.author = author;
        }
        if let Some(year) = update.year {
            record.year = year;
        }
        if let Some(department_id) = update.department_id {
            record.department_id = department_id;
        }
        record.version += 1;
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn set_status(
        &self,
        id: Uuid,
        expected: DocumentStatus,
        next: DocumentStatus,
        note: Option<String>,
    ) -> ArchiveResult<DocumentRecord> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(ArchiveError::NotFound)?;

        if record.status != expected {
            return Err(ArchiveError::Conflict(format!(
                "document status is '{}', expected '{}'",
                record.status, expected
            )));
        }

        record.status = next;
        if note.is_some() {
            record.review_note = note;
        }
        record.version += 1;
        record.updated_at = Utc::now();

        Ok(record.clone())
    }
}
