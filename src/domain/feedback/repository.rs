//! Feedback repository interface

use async_trait::async_trait;

use super::model::{Feedback, FeedbackRevision, NewFeedback};
use crate::domain::DomainResult;

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn find_by_user_and_question(
        &self,
        user_id: i32,
        question_id: i32,
    ) -> DomainResult<Option<Feedback>>;

    /// Fails with `Conflict` when a record for the same (user, question)
    /// already exists, and with `NotFound` on stores that enforce references
    /// when the user or question is gone.
    async fn insert(&self, feedback: NewFeedback) -> DomainResult<Feedback>;
    async fn update(&self, id: i32, revision: FeedbackRevision) -> DomainResult<Feedback>;

    async fn list_by_user(&self, user_id: i32) -> DomainResult<Vec<Feedback>>;
    async fn list_by_question(&self, question_id: i32) -> DomainResult<Vec<Feedback>>;
    /// Single bulk read used by the statistics paths.
    async fn list_by_questions(&self, question_ids: &[i32]) -> DomainResult<Vec<Feedback>>;
    /// Every record, newest submission first.
    async fn list_all(&self) -> DomainResult<Vec<Feedback>>;
}
