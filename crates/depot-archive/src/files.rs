//! File storage seam
//!
//! File storage and streaming are external collaborators; this crate
//! only needs to remove a stored file when a record is soft-deleted.
//! The in-memory implementation backs tests.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::RwLock;

/// File storage error types.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// No file at the given path.
    #[error("No file at '{0}'")]
    NotFound(String),

    /// Underlying storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for file storage operations.
pub type FileStoreResult<T> = Result<T, FileStoreError>;

/// The slice of file storage this crate depends on.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Remove the file at a path.
    async fn remove(&self, path: &str) -> FileStoreResult<()>;

    /// Check whether a file exists.
    async fn exists(&self, path: &str) -> bool;
}

/// In-memory file store for tests and single-process setups.
pub struct MemoryFileStore {
    files: RwLock<HashSet<String>>,
}

impl MemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashSet::new()),
        }
    }

    /// Record a stored file (stands in for the upload path).
    pub async fn put(&self, path: impl Into<String>) {
        self.files.write().await.insert(path.into());
    }
}

impl Default for MemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn remove(&self, path: &str) -> FileStoreResult<()> {
        if self.files.write().await.remove(path) {
            Ok(())
        } else {
            Err(FileStoreError::NotFound(path.to_string()))
        }
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.read().await.contains(path)
    }
}
