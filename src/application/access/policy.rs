//! Authorization decisions
//!
//! [`authorize`] is a pure function of the caller context and the action.
//! Rules apply in priority order and the first match wins:
//!
//! 1. self-access on the caller's own profile, password and feedback
//! 2. director escalation (executive passes everything, academic passes
//!    everything except role reassignment and global statistics)
//! 3. functional role gates

use std::fmt;

use metrics::counter;
use tracing::warn;

use crate::domain::{AuthoritySet, DenyReason, DomainError, DomainResult, RoleKind};

/// Resolved caller for a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub user_id: i32,
    pub authorities: AuthoritySet,
    pub department_id: Option<i32>,
    pub year: Option<i32>,
}

impl AuthContext {
    pub fn is_director(&self) -> bool {
        self.authorities.is_director()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadUser { target: i32 },
    UpdateUser { target: i32 },
    DeleteUser { target: i32 },
    ChangePassword { target: i32 },
    ReassignRoles { target: i32 },
    ListUsers,
    ManageDepartments,
    ManageQuestions,
    ListQuestionsByCreator,
    SubmitFeedback,
    ReadUserFeedback { owner: i32 },
    ReadQuestionFeedback,
    ListAllFeedback,
    DepartmentStatistics,
    GlobalStatistics,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadUser { .. } => "read_user",
            Self::UpdateUser { .. } => "update_user",
            Self::DeleteUser { .. } => "delete_user",
            Self::ChangePassword { .. } => "change_password",
            Self::ReassignRoles { .. } => "reassign_roles",
            Self::ListUsers => "list_users",
            Self::ManageDepartments => "manage_departments",
            Self::ManageQuestions => "manage_questions",
            Self::ListQuestionsByCreator => "list_questions_by_creator",
            Self::SubmitFeedback => "submit_feedback",
            Self::ReadUserFeedback { .. } => "read_user_feedback",
            Self::ReadQuestionFeedback => "read_question_feedback",
            Self::ListAllFeedback => "list_all_feedback",
            Self::DepartmentStatistics => "department_statistics",
            Self::GlobalStatistics => "global_statistics",
        }
    }

    /// The user an action is about, for actions that have a self-access path.
    fn owned_target(&self) -> Option<i32> {
        match *self {
            Self::ReadUser { target }
            | Self::UpdateUser { target }
            | Self::DeleteUser { target }
            | Self::ChangePassword { target } => Some(target),
            Self::ReadUserFeedback { owner } => Some(owner),
            Self::ReassignRoles { .. }
            | Self::ListUsers
            | Self::ManageDepartments
            | Self::ManageQuestions
            | Self::ListQuestionsByCreator
            | Self::SubmitFeedback
            | Self::ReadQuestionFeedback
            | Self::ListAllFeedback
            | Self::DepartmentStatistics
            | Self::GlobalStatistics => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DenyReason),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

pub fn authorize(ctx: &AuthContext, action: &Action) -> Verdict {
    let owned_target = action.owned_target();

    if owned_target == Some(ctx.user_id) {
        return Verdict::Allow;
    }

    if ctx.authorities.is_executive() {
        return Verdict::Allow;
    }

    if ctx.authorities.contains(RoleKind::AcademicDirector) {
        return match action {
            Action::ReassignRoles { .. } | Action::GlobalStatistics => {
                Verdict::Deny(DenyReason::RoleMismatch)
            }
            _ => Verdict::Allow,
        };
    }

    match action {
        Action::SubmitFeedback => {
            if ctx.authorities.contains(RoleKind::Student)
                || ctx.authorities.contains(RoleKind::Staff)
            {
                Verdict::Allow
            } else {
                Verdict::Deny(DenyReason::RoleMismatch)
            }
        }
        _ if owned_target.is_some() => Verdict::Deny(DenyReason::SelfOnly),
        _ => Verdict::Deny(DenyReason::RoleMismatch),
    }
}

/// [`authorize`] lifted into a `DomainResult`, recording denials.
pub fn ensure(ctx: &AuthContext, action: Action) -> DomainResult<()> {
    match authorize(ctx, &action) {
        Verdict::Allow => Ok(()),
        Verdict::Deny(reason) => Err(deny(ctx, action.name(), reason)),
    }
}

/// Builds the `Forbidden` error for a denial and records it.
pub(crate) fn deny(ctx: &AuthContext, action: &str, reason: DenyReason) -> DomainError {
    warn!(
        user_id = ctx.user_id,
        action,
        reason = reason.as_str(),
        "Authorization denied"
    );
    counter!("authorization_denials_total", "reason" => reason.as_str()).increment(1);

    let message = match reason {
        DenyReason::RoleMismatch => format!("Your roles do not permit {}", action),
        DenyReason::ScopeMismatch => {
            "The target is outside your department or year".to_string()
        }
        DenyReason::SelfOnly => "You can only access your own records".to_string(),
    };
    DomainError::forbidden(reason, message)
}
