//! Department master data
//!
//! Departments are the optional secondary scoping dimension attached to
//! identities and document records. They are owned by external
//! master-data management; this crate only reads them, plus a seed/test
//! insert on the memory store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{IdentityError, IdentityResult};

/// An academic program or organizational unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    /// Unique department ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique short code.
    pub code: String,
    /// Name of the department head, if recorded.
    pub head: Option<String>,
    /// Whether the department is active.
    pub active: bool,
}

impl Department {
    /// Create a new department.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            code: code.into(),
            head: None,
            active: true,
        }
    }

    /// Set the department head.
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }
}

/// Read seam for department master data.
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// Load a department by id.
    async fn department(&self, id: Uuid) -> IdentityResult<Department>;

    /// Load a department by its display name.
    async fn department_by_name(&self, name: &str) -> IdentityResult<Department>;

    /// All departments, ordered by name.
    async fn list_departments(&self) -> IdentityResult<Vec<Department>>;
}

/// In-memory department store.
pub struct MemoryDepartmentStore {
    departments: RwLock<HashMap<Uuid, Department>>,
}

impl MemoryDepartmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            departments: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a department (seed/test helper).
    pub async fn insert(&self, department: Department) {
        self.departments
            .write()
            .await
            .insert(department.id, department);
    }
}

impl Default for MemoryDepartmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DepartmentStore for MemoryDepartmentStore {
    async fn department(&self, id: Uuid) -> IdentityResult<Department> {
        self.departments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(IdentityError::NotFound)
    }

    async fn department_by_name(&self, name: &str) -> IdentityResult<Department> {
        self.departments
            .read()
            .await
            .values()
            .find(|d| d.name == name)
            .cloned()
            .ok_or(IdentityError::NotFound)
    }

    async fn list_departments(&self) -> IdentityResult<Vec<Department>> {
        let mut departments: Vec<Department> =
            self.departments.read().await.values().cloned().collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }
}
