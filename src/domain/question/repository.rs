use async_trait::async_trait;

use super::model::{NewQuestion, Question, QuestionChanges, QuestionFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: NewQuestion) -> DomainResult<Question>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Question>>;
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Question>>;
    /// Questions matching `filter`, ordered by id.
    async fn list(&self, filter: &QuestionFilter) -> DomainResult<Vec<Question>>;
    async fn list_by_departments(&self, department_ids: &[i32]) -> DomainResult<Vec<Question>>;
    async fn update(&self, id: i32, changes: QuestionChanges) -> DomainResult<Question>;
    /// Removes the question together with its feedback.
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn count_in_department(&self, department_id: i32) -> DomainResult<u64>;
}
