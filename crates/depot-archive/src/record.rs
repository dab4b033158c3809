//! Document record domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::DocumentStatus;

/// Reference to the stored file backing a document record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage path/key.
    pub path: String,
    /// Original file name as uploaded.
    pub name: String,
    /// File size in bytes, when known.
    pub size: Option<u64>,
}

impl StoredFile {
    /// Create a stored-file reference.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            size: None,
        }
    }

    /// Set the file size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// The governed resource: a submitted document record.
///
/// `uploaded_by` is immutable after creation and `status` only moves
/// through the lifecycle state machine; neither appears in
/// [`DocumentUpdate`], so ordinary edits cannot touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique record ID.
    pub id: Uuid,

    /// Document title.
    pub title: String,

    /// Abstract text.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Author display name.
    pub author: String,

    /// Publication/submission year.
    pub year: Option<i32>,

    /// The stored file behind this record.
    pub file: StoredFile,

    /// Identity that uploaded the record. Immutable.
    pub uploaded_by: Uuid,

    /// Optional department scope.
    pub department_id: Option<Uuid>,

    /// Lifecycle status.
    pub status: DocumentStatus,

    /// Reviewer's note from the latest reject, when one was given.
    pub review_note: Option<String>,

    /// Monotonic revision counter, bumped on every write.
    pub version: u64,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Create a record from upload input.
    pub fn new(new: NewDocument, uploaded_by: Uuid, status: DocumentStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: new.title,
            abstract_text: new.abstract_text,
            author: new.author,
            year: new.year,
            file: new.file,
            uploaded_by,
            department_id: new.department_id,
            status,
            review_note: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Upload input for a new document record.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Document title.
    pub title: String,
    /// Abstract text.
    pub abstract_text: Option<String>,
    /// Author display name.
    pub author: String,
    /// Publication/submission year.
    pub year: Option<i32>,
    /// The already-stored file (upload happens before metadata
    /// validation; see the cleanup contract on `ArchiveService::create`).
    pub file: StoredFile,
    /// Optional department scope.
    pub department_id: Option<Uuid>,
    /// Ask for the record to start at pending-review instead of draft.
    pub submit_for_review: bool,
}

impl NewDocument {
    /// Create upload input with the given title, author, and file.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        file: StoredFile,
    ) -> Self {
        Self {
            title: title.into(),
            abstract_text: None,
            author: author.into(),
            year: None,
            file,
            department_id: None,
            submit_for_review: false,
        }
    }

    /// Set the abstract text.
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Set the year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the department scope.
    pub fn with_department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Request the record start at pending-review.
    pub fn submitted_for_review(mut self) -> Self {
        self.submit_for_review = true;
        self
    }
}

/// Metadata update; every field independently optional.
///
/// Status and uploader are deliberately absent: status moves only
/// through lifecycle transitions, the uploader never changes.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpdate {
    /// New title.
    pub title: Option<String>,
    /// Set or clear the abstract.
    pub abstract_text: Option<Option<String>>,
    /// New author.
    pub author: Option<String>,
    /// Set or clear the year.
    pub year: Option<Option<i32>>,
    /// Set or clear the department scope.
    pub department_id: Option<Option<Uuid>>,
}

impl DocumentUpdate {
    /// An update that touches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set or clear the abstract.
    pub fn abstract_text(mut self, text: Option<String>) -> Self {
        self.abstract_text = Some(text);
        self
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set or clear the year.
    pub fn year(mut self, year: Option<i32>) -> Self {
        self.year = Some(year);
        self
    }

    /// Set or clear the department scope.
    pub fn department(mut self, department_id: Option<Uuid>) -> Self {
        self.department_id = Some(department_id);
        self
    }
}
