//! Department repository interface

use async_trait::async_trait;

use super::model::{Department, DepartmentChanges, NewDepartment};
use crate::domain::DomainResult;

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Fails with `Conflict` on a duplicate name.
    async fn create(&self, department: NewDepartment) -> DomainResult<Department>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Department>>;
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Department>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Department>>;
    /// All departments ordered by name.
    async fn list(&self) -> DomainResult<Vec<Department>>;
    async fn list_active(&self) -> DomainResult<Vec<Department>>;
    async fn update(&self, id: i32, changes: DepartmentChanges) -> DomainResult<Department>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
