//! Question DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::catalog::{CreateQuestion, UpdateQuestion};
use crate::application::{ListingRequest, Related};
use crate::domain::{DomainResult, Question, RoleTarget};
use crate::interfaces::http::common::requested_status;
use crate::interfaces::http::modules::departments::DepartmentSummary;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionDto {
    pub id: i32,
    pub text: String,
    pub year: i32,
    pub department_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentSummary>,
    /// `student`, `staff` or `both`
    pub role_target: String,
    pub status: String,
    pub active: bool,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionDto {
    fn from(q: Question) -> Self {
        Self {
            active: q.is_active(),
            role_target: q.role_target.as_str().to_string(),
            status: q.status.as_str().to_string(),
            id: q.id,
            text: q.text,
            year: q.year,
            department_id: q.department_id,
            department: None,
            created_by: q.created_by,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

impl QuestionDto {
    pub fn with_related(question: Question, related: &Related) -> Self {
        let department = related
            .department(Some(question.department_id))
            .map(DepartmentSummary::from);
        Self {
            department,
            ..Self::from(question)
        }
    }
}

/// Question reference embedded in feedback responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionSummary {
    pub id: i32,
    pub text: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentSummary>,
}

impl QuestionSummary {
    pub fn with_related(question: &Question, related: &Related) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            year: question.year,
            department: related
                .department(Some(question.department_id))
                .map(DepartmentSummary::from),
        }
    }
}

fn parse_target(target: Option<&str>) -> DomainResult<Option<RoleTarget>> {
    target.map(RoleTarget::parse).transpose()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "text must be 1-1000 characters"))]
    pub text: String,
    /// Year of study, 1-5
    pub year: i32,
    pub department_id: i32,
    /// `student`, `staff` or `both` (default)
    #[serde(alias = "role")]
    pub role_target: Option<String>,
    pub status: Option<String>,
    pub active: Option<bool>,
}

impl CreateQuestionRequest {
    pub fn into_command(self) -> DomainResult<CreateQuestion> {
        Ok(CreateQuestion {
            role_target: parse_target(self.role_target.as_deref())?,
            status: requested_status(self.status.as_deref(), self.active)?,
            text: self.text,
            year: self.year,
            department_id: self.department_id,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "text must be 1-1000 characters"))]
    pub text: Option<String>,
    pub year: Option<i32>,
    pub department_id: Option<i32>,
    #[serde(alias = "role")]
    pub role_target: Option<String>,
    pub status: Option<String>,
    pub active: Option<bool>,
}

impl UpdateQuestionRequest {
    pub fn into_command(self) -> DomainResult<UpdateQuestion> {
        Ok(UpdateQuestion {
            role_target: parse_target(self.role_target.as_deref())?,
            status: requested_status(self.status.as_deref(), self.active)?,
            text: self.text,
            year: self.year,
            department_id: self.department_id,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuestionsParams {
    pub department_id: Option<i32>,
    pub year: Option<i32>,
    /// Directors only; ignored for everyone else
    #[serde(default)]
    pub include_inactive: bool,
}

impl From<ListQuestionsParams> for ListingRequest {
    fn from(p: ListQuestionsParams) -> Self {
        Self {
            department_id: p.department_id,
            year: p.year,
            include_inactive: p.include_inactive,
        }
    }
}
