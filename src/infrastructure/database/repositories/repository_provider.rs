//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use super::db_err;
use super::department_repository::SeaOrmDepartmentRepository;
use super::feedback_repository::SeaOrmFeedbackRepository;
use super::question_repository::SeaOrmQuestionRepository;
use super::user_repository::SeaOrmUserRepository;
use crate::domain::department::DepartmentRepository;
use crate::domain::feedback::FeedbackRepository;
use crate::domain::question::QuestionRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;
use crate::domain::DomainResult;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    users: SeaOrmUserRepository,
    departments: SeaOrmDepartmentRepository,
    questions: SeaOrmQuestionRepository,
    feedback: SeaOrmFeedbackRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            departments: SeaOrmDepartmentRepository::new(db.clone()),
            questions: SeaOrmQuestionRepository::new(db.clone()),
            feedback: SeaOrmFeedbackRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn departments(&self) -> &dyn DepartmentRepository {
        &self.departments
    }

    fn questions(&self) -> &dyn QuestionRepository {
        &self.questions
    }

    fn feedback(&self) -> &dyn FeedbackRepository {
        &self.feedback
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
