//! Question domain entity and listing predicate

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::lifecycle::LifecycleState;
use crate::domain::role::RoleKind;
use crate::shared::{DomainError, DomainResult};

/// Years a question may target.
pub const QUESTION_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// Audience of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoleTarget {
    Student,
    Staff,
    #[default]
    Both,
}

impl RoleTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Staff => "staff",
            Self::Both => "both",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "staff" => Ok(Self::Staff),
            "both" => Ok(Self::Both),
            other => Err(DomainError::Validation(format!(
                "Invalid role '{}'; expected student, staff or both",
                other
            ))),
        }
    }

    /// Targets a holder of `role` may see.
    pub fn visible_to(role: RoleKind) -> &'static [RoleTarget] {
        match role {
            RoleKind::Student => &[RoleTarget::Student, RoleTarget::Both],
            RoleKind::Staff => &[RoleTarget::Staff, RoleTarget::Both],
            RoleKind::AcademicDirector | RoleKind::ExecutiveDirector => {
                &[RoleTarget::Student, RoleTarget::Staff, RoleTarget::Both]
            }
        }
    }
}

impl fmt::Display for RoleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub year: i32,
    pub department_id: i32,
    pub role_target: RoleTarget,
    pub status: LifecycleState,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub year: i32,
    pub department_id: i32,
    pub role_target: RoleTarget,
    pub status: LifecycleState,
    pub created_by: i32,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionChanges {
    pub text: Option<String>,
    pub year: Option<i32>,
    pub department_id: Option<i32>,
    pub role_target: Option<RoleTarget>,
    pub status: Option<LifecycleState>,
}

/// Listing predicate, translated into a query by each store.
///
/// `role_targets: Some(vec![])` admits nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionFilter {
    pub active_only: bool,
    pub role_targets: Option<Vec<RoleTarget>>,
    pub department_id: Option<i32>,
    pub year: Option<i32>,
    pub created_by: Option<i32>,
}

impl QuestionFilter {
    pub fn nothing() -> Self {
        Self {
            active_only: true,
            role_targets: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn admits_nothing(&self) -> bool {
        matches!(&self.role_targets, Some(targets) if targets.is_empty())
    }

    pub fn matches(&self, question: &Question) -> bool {
        if self.active_only && !question.is_active() {
            return false;
        }
        if let Some(targets) = &self.role_targets {
            if !targets.contains(&question.role_target) {
                return false;
            }
        }
        self.department_id.map_or(true, |d| d == question.department_id)
            && self.year.map_or(true, |y| y == question.year)
            && self.created_by.map_or(true, |c| c == question.created_by)
    }
}
