use async_trait::async_trait;

use super::{NewUser, User, UserChanges, UserQuery};
use crate::domain::role::RoleKind;
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when username, email or SIN is taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    /// Users whose id is in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_by_sin_number(&self, sin_number: &str) -> DomainResult<Option<User>>;
    async fn list(&self, query: UserQuery) -> DomainResult<PaginatedResult<User>>;

    async fn update(&self, id: i32, changes: UserChanges) -> DomainResult<User>;
    async fn update_password(&self, id: i32, password_hash: &str) -> DomainResult<()>;
    /// Replaces the assignment set and makes the first role primary.
    async fn set_roles(&self, id: i32, roles: Vec<RoleKind>) -> DomainResult<User>;
    async fn delete(&self, id: i32) -> DomainResult<()>;

    async fn count(&self) -> DomainResult<u64>;
    async fn count_in_department(&self, department_id: i32) -> DomainResult<u64>;
}
