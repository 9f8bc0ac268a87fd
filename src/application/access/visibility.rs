//! Question visibility
//!
//! Builds the listing predicate for a caller and checks submission scope.
//! Directors see every question. Students and staff see active questions
//! aimed at their role, inside their own department and year. A caller with
//! neither functional role sees nothing.

use crate::domain::{
    DenyReason, DomainResult, Question, QuestionFilter, RoleKind, RoleTarget,
};

use super::policy::{deny, AuthContext};

/// Listing parameters supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingRequest {
    pub department_id: Option<i32>,
    pub year: Option<i32>,
    /// Only honoured for directors.
    pub include_inactive: bool,
}

/// Role targets admitted by the caller's functional roles; `None` means
/// unrestricted.
pub fn role_targets(ctx: &AuthContext) -> Option<Vec<RoleTarget>> {
    if ctx.is_director() {
        return None;
    }

    let mut targets: Vec<RoleTarget> = Vec::new();
    for role in ctx.authorities.iter() {
        match role {
            RoleKind::Student | RoleKind::Staff => {
                for target in RoleTarget::visible_to(role) {
                    if !targets.contains(target) {
                        targets.push(*target);
                    }
                }
            }
            RoleKind::AcademicDirector | RoleKind::ExecutiveDirector => {}
        }
    }
    Some(targets)
}

pub fn listing_filter(ctx: &AuthContext, request: ListingRequest) -> QuestionFilter {
    if ctx.is_director() {
        return QuestionFilter {
            active_only: !request.include_inactive,
            role_targets: None,
            department_id: request.department_id,
            year: request.year,
            created_by: None,
        };
    }

    let (Some(department_id), Some(year)) = (ctx.department_id, ctx.year) else {
        return QuestionFilter::nothing();
    };
    if request.department_id.is_some_and(|d| d != department_id)
        || request.year.is_some_and(|y| y != year)
    {
        return QuestionFilter::nothing();
    }

    let role_targets = role_targets(ctx);
    if role_targets.as_ref().is_some_and(|t| t.is_empty()) {
        return QuestionFilter::nothing();
    }

    QuestionFilter {
        active_only: true,
        role_targets,
        department_id: Some(department_id),
        year: Some(year),
        created_by: None,
    }
}

/// Whether a single question would appear in the caller's listing.
pub fn is_visible(ctx: &AuthContext, question: &Question) -> bool {
    listing_filter(
        ctx,
        ListingRequest {
            include_inactive: true,
            ..Default::default()
        },
    )
    .matches(question)
}

/// Department, year and role-target preconditions for submitting feedback.
pub fn check_submission_scope(ctx: &AuthContext, question: &Question) -> DomainResult<()> {
    if ctx.department_id != Some(question.department_id) {
        return Err(deny(ctx, "submit_feedback", DenyReason::ScopeMismatch));
    }
    if ctx.year != Some(question.year) {
        return Err(deny(ctx, "submit_feedback", DenyReason::ScopeMismatch));
    }
    let admitted = match role_targets(ctx) {
        None => true,
        Some(targets) => targets.contains(&question.role_target),
    };
    if !admitted {
        return Err(deny(ctx, "submit_feedback", DenyReason::RoleMismatch));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::LifecycleState;

    fn ctx(roles: &[RoleKind], department_id: Option<i32>, year: Option<i32>) -> AuthContext {
        AuthContext {
            user_id: 10,
            authorities: roles.iter().copied().collect(),
            department_id,
            year,
        }
    }

    fn question(id: i32, role_target: RoleTarget) -> Question {
        Question {
            id,
            text: format!("Question {}", id),
            year: 2,
            department_id: 3,
            role_target,
            status: LifecycleState::Active,
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn visible_ids(ctx: &AuthContext, questions: &[Question]) -> Vec<i32> {
        let filter = listing_filter(ctx, ListingRequest::default());
        questions
            .iter()
            .filter(|q| filter.matches(q))
            .map(|q| q.id)
            .collect()
    }

    fn catalog() -> Vec<Question> {
        vec![
            question(1, RoleTarget::Student),
            question(2, RoleTarget::Staff),
            question(3, RoleTarget::Both),
        ]
    }

    #[test]
    fn student_sees_student_and_both() {
        let student = ctx(&[RoleKind::Student], Some(3), Some(2));
        assert_eq!(visible_ids(&student, &catalog()), vec![1, 3]);
    }

    #[test]
    fn staff_never_sees_student_only() {
        let staff = ctx(&[RoleKind::Staff], Some(3), Some(2));
        assert_eq!(visible_ids(&staff, &catalog()), vec![2, 3]);
    }

    #[test]
    fn director_sees_everything_anywhere() {
        let director = ctx(&[RoleKind::AcademicDirector], None, None);
        assert_eq!(visible_ids(&director, &catalog()), vec![1, 2, 3]);
    }

    #[test]
    fn no_functional_role_sees_nothing() {
        let nobody = ctx(&[], Some(3), Some(2));
        assert!(visible_ids(&nobody, &catalog()).is_empty());
    }

    #[test]
    fn other_department_or_year_sees_nothing() {
        assert!(visible_ids(&ctx(&[RoleKind::Student], Some(4), Some(2)), &catalog()).is_empty());
        assert!(visible_ids(&ctx(&[RoleKind::Student], Some(3), Some(1)), &catalog()).is_empty());
        assert!(visible_ids(&ctx(&[RoleKind::Student], None, Some(2)), &catalog()).is_empty());
    }

    #[test]
    fn requesting_a_foreign_department_yields_nothing() {
        let student = ctx(&[RoleKind::Student], Some(3), Some(2));
        let filter = listing_filter(
            &student,
            ListingRequest {
                department_id: Some(9),
                ..Default::default()
            },
        );
        assert!(filter.admits_nothing());
    }

    #[test]
    fn inactive_questions_are_hidden_from_non_directors() {
        let mut retired = question(4, RoleTarget::Both);
        retired.status = LifecycleState::Retired;
        assert!(!is_visible(&ctx(&[RoleKind::Student], Some(3), Some(2)), &retired));
        assert!(is_visible(&ctx(&[RoleKind::ExecutiveDirector], None, None), &retired));
    }

    #[test]
    fn submission_scope_checks() {
        let student = ctx(&[RoleKind::Student], Some(3), Some(2));
        assert!(check_submission_scope(&student, &question(1, RoleTarget::Student)).is_ok());

        let err = check_submission_scope(&student, &question(2, RoleTarget::Staff)).unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::RoleMismatch));

        let elsewhere = ctx(&[RoleKind::Student], Some(8), Some(2));
        let err = check_submission_scope(&elsewhere, &question(1, RoleTarget::Student)).unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::ScopeMismatch));

        let other_year = ctx(&[RoleKind::Student], Some(3), Some(4));
        let err =
            check_submission_scope(&other_year, &question(1, RoleTarget::Student)).unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::ScopeMismatch));
    }
}
