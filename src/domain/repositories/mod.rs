//! Repository access for the domain layer
//!
//! `RepositoryProvider` hands out per-aggregate repositories. Consumers
//! request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) -> DomainResult<()> {
//!     let question = repos.questions().find_by_id(12).await?;
//!     let records = repos.feedback().list_by_question(12).await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use super::department::DepartmentRepository;
use super::feedback::FeedbackRepository;
use super::question::QuestionRepository;
use super::user::UserRepository;
use crate::shared::DomainResult;

#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn departments(&self) -> &dyn DepartmentRepository;
    fn questions(&self) -> &dyn QuestionRepository;
    fn feedback(&self) -> &dyn FeedbackRepository;

    /// Cheap liveness check for the health endpoint.
    async fn ping(&self) -> DomainResult<()>;
}
