//! Question management and visibility-filtered reads

use std::sync::Arc;

use tracing::info;

use crate::application::access::{ensure, is_visible, listing_filter, Action, AuthContext, ListingRequest};
use crate::domain::question::QUESTION_YEAR_RANGE;
use crate::domain::{
    DomainError, DomainResult, LifecycleState, NewQuestion, Question, QuestionChanges,
    QuestionFilter, RepositoryProvider, RoleTarget,
};

#[derive(Debug, Clone)]
pub struct CreateQuestion {
    pub text: String,
    pub year: i32,
    pub department_id: i32,
    /// Defaults to `Both`.
    pub role_target: Option<RoleTarget>,
    /// Defaults to `Active`.
    pub status: Option<LifecycleState>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateQuestion {
    pub text: Option<String>,
    pub year: Option<i32>,
    pub department_id: Option<i32>,
    pub role_target: Option<RoleTarget>,
    pub status: Option<LifecycleState>,
}

pub struct QuestionService {
    repos: Arc<dyn RepositoryProvider>,
}

fn check_year(year: i32) -> DomainResult<()> {
    if QUESTION_YEAR_RANGE.contains(&year) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Question year must be between {} and {}",
            QUESTION_YEAR_RANGE.start(),
            QUESTION_YEAR_RANGE.end()
        )))
    }
}

fn clean_text(text: &str) -> DomainResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation("Question text is required".into()));
    }
    Ok(text.to_string())
}

impl QuestionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn load(&self, id: i32) -> DomainResult<Question> {
        self.repos
            .questions()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", "id", id))
    }

    async fn check_department(&self, department_id: i32) -> DomainResult<()> {
        match self.repos.departments().find_by_id(department_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Department", "id", department_id)),
        }
    }

    pub async fn create(&self, ctx: &AuthContext, command: CreateQuestion) -> DomainResult<Question> {
        ensure(ctx, Action::ManageQuestions)?;
        let text = clean_text(&command.text)?;
        check_year(command.year)?;
        self.check_department(command.department_id).await?;

        let question = self
            .repos
            .questions()
            .create(NewQuestion {
                text,
                year: command.year,
                department_id: command.department_id,
                role_target: command.role_target.unwrap_or_default(),
                status: command.status.unwrap_or(LifecycleState::Active),
                created_by: ctx.user_id,
            })
            .await?;

        info!(
            question_id = question.id,
            department_id = question.department_id,
            role_target = %question.role_target,
            "Question created"
        );
        Ok(question)
    }

    /// Questions the caller may see; an empty list is not an error.
    pub async fn list(&self, ctx: &AuthContext, request: ListingRequest) -> DomainResult<Vec<Question>> {
        let filter = listing_filter(ctx, request);
        if filter.admits_nothing() {
            return Ok(Vec::new());
        }
        self.repos.questions().list(&filter).await
    }

    /// Hidden questions are reported as missing.
    pub async fn get(&self, ctx: &AuthContext, id: i32) -> DomainResult<Question> {
        let question = self.load(id).await?;
        if !is_visible(ctx, &question) {
            return Err(DomainError::not_found("Question", "id", id));
        }
        Ok(question)
    }

    pub async fn list_by_creator(&self, ctx: &AuthContext, creator_id: i32) -> DomainResult<Vec<Question>> {
        ensure(ctx, Action::ListQuestionsByCreator)?;
        let filter = QuestionFilter {
            created_by: Some(creator_id),
            ..Default::default()
        };
        self.repos.questions().list(&filter).await
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i32,
        command: UpdateQuestion,
    ) -> DomainResult<Question> {
        ensure(ctx, Action::ManageQuestions)?;
        let current = self.load(id).await?;

        let text = command.text.as_deref().map(clean_text).transpose()?;
        if let Some(year) = command.year {
            check_year(year)?;
        }
        if let Some(department_id) = command.department_id {
            self.check_department(department_id).await?;
        }
        let status = command
            .status
            .map(|target| current.status.transition_to(target))
            .transpose()?;

        let question = self
            .repos
            .questions()
            .update(
                id,
                QuestionChanges {
                    text,
                    year: command.year,
                    department_id: command.department_id,
                    role_target: command.role_target,
                    status,
                },
            )
            .await?;

        info!(question_id = id, status = %question.status, "Question updated");
        Ok(question)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i32) -> DomainResult<()> {
        ensure(ctx, Action::ManageQuestions)?;
        self.load(id).await?;
        self.repos.questions().delete(id).await?;
        info!(question_id = id, "Question deleted");
        Ok(())
    }
}
