//! Feedback and statistics DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::feedback::{
    DepartmentStats, GlobalStats, QuestionFeedback, QuestionStats, RatingStats, SubmitFeedback,
};
use crate::application::Related;
use crate::domain::Feedback;
use crate::interfaces::http::modules::questions::{QuestionDto, QuestionSummary};
use crate::interfaces::http::modules::users::UserSummary;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitFeedbackRequest {
    pub question_id: i32,
    /// 1-5; checked after the question lookup
    pub rating: i32,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl From<SubmitFeedbackRequest> for SubmitFeedback {
    fn from(r: SubmitFeedbackRequest) -> Self {
        Self {
            question_id: r.question_id,
            rating: r.rating,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackDto {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// Present on listings that resolve the answered question
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionSummary>,
    /// Present on listings that resolve the submitter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl From<Feedback> for FeedbackDto {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            user_id: f.user_id,
            question_id: f.question_id,
            rating: f.rating.value(),
            notes: f.notes,
            submitted_at: f.submitted_at,
            question: None,
            user: None,
        }
    }
}

impl FeedbackDto {
    /// Embeds whichever of question and submitter `related` holds.
    pub fn with_related(record: Feedback, related: &Related) -> Self {
        let question = related
            .question(record.question_id)
            .map(|q| QuestionSummary::with_related(q, related));
        let user = related
            .user(record.user_id)
            .map(|u| UserSummary::with_related(u, related));
        Self {
            question,
            user,
            ..Self::from(record)
        }
    }
}

pub fn to_dtos(records: Vec<Feedback>, related: &Related) -> Vec<FeedbackDto> {
    records
        .into_iter()
        .map(|f| FeedbackDto::with_related(f, related))
        .collect()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RatingStatsDto {
    pub count: u64,
    /// Mean rating rounded to two decimals; 0 when empty
    pub average: f64,
    /// Count per rating, keys `"1"` through `"5"`
    pub distribution: BTreeMap<String, u64>,
}

impl From<RatingStats> for RatingStatsDto {
    fn from(s: RatingStats) -> Self {
        Self {
            count: s.count,
            average: s.average,
            distribution: s.distribution,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionStatsDto {
    pub question_id: i32,
    pub text: String,
    pub stats: RatingStatsDto,
}

impl From<QuestionStats> for QuestionStatsDto {
    fn from(s: QuestionStats) -> Self {
        Self {
            question_id: s.question_id,
            text: s.text,
            stats: s.stats.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentStatsDto {
    pub department_id: i32,
    pub name: String,
    pub total: RatingStatsDto,
    pub questions: Vec<QuestionStatsDto>,
}

impl From<DepartmentStats> for DepartmentStatsDto {
    fn from(s: DepartmentStats) -> Self {
        Self {
            department_id: s.department_id,
            name: s.name,
            total: s.total.into(),
            questions: s.questions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GlobalStatsDto {
    pub total: RatingStatsDto,
    pub departments: Vec<DepartmentStatsDto>,
}

impl From<GlobalStats> for GlobalStatsDto {
    fn from(s: GlobalStats) -> Self {
        Self {
            total: s.total.into(),
            departments: s.departments.into_iter().map(Into::into).collect(),
        }
    }
}

/// A question with its statistics and every answer to it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionFeedbackDto {
    pub question: QuestionDto,
    pub stats: RatingStatsDto,
    pub records: Vec<FeedbackDto>,
}

impl QuestionFeedbackDto {
    /// Records carry their submitters; the question is reported once at the top.
    pub fn with_related(q: QuestionFeedback, related: &Related) -> Self {
        let records = q
            .records
            .into_iter()
            .map(|f| FeedbackDto {
                question: None,
                ..FeedbackDto::with_related(f, related)
            })
            .collect();
        Self {
            question: QuestionDto::with_related(q.question, related),
            stats: q.stats.into(),
            records,
        }
    }
}
