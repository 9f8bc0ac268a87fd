//! Feedback submission and statistics
//!
//! Statistics read each feedback set once in bulk and reduce it in memory.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};

use super::aggregator::{self, DepartmentStats, GlobalStats, RatingStats};
use super::reconciler::{self, Submission, SubmitOutcome};
use crate::application::access::{check_submission_scope, ensure, Action, AuthContext};
use crate::domain::{
    DomainError, DomainResult, Feedback, Question, QuestionFilter, Rating, RepositoryProvider,
};

#[derive(Debug, Clone)]
pub struct SubmitFeedback {
    pub question_id: i32,
    pub rating: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuestionFeedback {
    pub question: Question,
    pub stats: RatingStats,
    pub records: Vec<Feedback>,
}

pub struct FeedbackService {
    repos: Arc<dyn RepositoryProvider>,
}

fn record_submission(outcome: &'static str) {
    counter!("feedback_submissions_total", "outcome" => outcome).increment(1);
}

impl FeedbackService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn load_question(&self, id: i32) -> DomainResult<Question> {
        self.repos
            .questions()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", "id", id))
    }

    /// Checks run in order: question exists and is active, rating in range,
    /// caller may submit, department, year, role target.
    async fn admit(&self, ctx: &AuthContext, command: &SubmitFeedback) -> DomainResult<Rating> {
        let question = self.load_question(command.question_id).await?;
        if !question.is_active() {
            return Err(DomainError::Validation(format!(
                "Question {} is not accepting feedback",
                question.id
            )));
        }
        let rating = Rating::new(command.rating)?;
        ensure(ctx, Action::SubmitFeedback)?;
        check_submission_scope(ctx, &question)?;
        Ok(rating)
    }

    pub async fn submit(&self, ctx: &AuthContext, command: SubmitFeedback) -> DomainResult<SubmitOutcome> {
        let rating = match self.admit(ctx, &command).await {
            Ok(rating) => rating,
            Err(e) => {
                record_submission("rejected");
                return Err(e);
            }
        };

        let outcome = reconciler::upsert(
            self.repos.feedback(),
            Submission {
                user_id: ctx.user_id,
                question_id: command.question_id,
                rating,
                notes: command.notes,
            },
        )
        .await?;

        record_submission(if outcome.created { "created" } else { "updated" });
        info!(
            user_id = ctx.user_id,
            question_id = command.question_id,
            rating = rating.value(),
            created = outcome.created,
            "Feedback submitted"
        );
        Ok(outcome)
    }

    pub async fn mine(&self, ctx: &AuthContext) -> DomainResult<Vec<Feedback>> {
        self.repos.feedback().list_by_user(ctx.user_id).await
    }

    pub async fn by_user(&self, ctx: &AuthContext, user_id: i32) -> DomainResult<Vec<Feedback>> {
        ensure(ctx, Action::ReadUserFeedback { owner: user_id })?;
        if self.repos.users().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User", "id", user_id));
        }
        self.repos.feedback().list_by_user(user_id).await
    }

    pub async fn for_question(&self, ctx: &AuthContext, question_id: i32) -> DomainResult<QuestionFeedback> {
        ensure(ctx, Action::ReadQuestionFeedback)?;
        let question = self.load_question(question_id).await?;
        let records = self.repos.feedback().list_by_question(question_id).await?;
        Ok(QuestionFeedback {
            stats: aggregator::aggregate(&records),
            question,
            records,
        })
    }

    pub async fn department_stats(&self, ctx: &AuthContext, department_id: i32) -> DomainResult<DepartmentStats> {
        ensure(ctx, Action::DepartmentStatistics)?;
        let department = self
            .repos
            .departments()
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Department", "id", department_id))?;

        let questions = self
            .repos
            .questions()
            .list(&QuestionFilter {
                department_id: Some(department_id),
                ..Default::default()
            })
            .await?;
        let ids: Vec<i32> = questions.iter().map(|q| q.id).collect();
        let records = self.repos.feedback().list_by_questions(&ids).await?;

        Ok(aggregator::by_department(&department, &questions, &records))
    }

    /// Totals across active departments.
    pub async fn overall_stats(&self, ctx: &AuthContext) -> DomainResult<GlobalStats> {
        ensure(ctx, Action::GlobalStatistics)?;
        let departments = self.repos.departments().list_active().await?;
        let department_ids: Vec<i32> = departments.iter().map(|d| d.id).collect();

        let questions = self
            .repos
            .questions()
            .list_by_departments(&department_ids)
            .await?;
        let ids: Vec<i32> = questions.iter().map(|q| q.id).collect();
        let records = self.repos.feedback().list_by_questions(&ids).await?;

        if records.is_empty() {
            warn!("Overall statistics requested with no feedback recorded");
        }
        Ok(aggregator::global(&departments, &questions, &records))
    }

    pub async fn all(&self, ctx: &AuthContext) -> DomainResult<Vec<Feedback>> {
        ensure(ctx, Action::ListAllFeedback)?;
        self.repos.feedback().list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DenyReason, LifecycleState, NewDepartment, NewQuestion, NewUser, RoleKind, RoleTarget,
    };
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    struct Fixture {
        svc: FeedbackService,
        student: AuthContext,
        q_student: i32,
        q_staff: i32,
        q_both: i32,
        department_id: i32,
    }

    async fn fixture() -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let dept = repos
            .departments()
            .create(NewDepartment {
                name: "D".into(),
                description: None,
                status: LifecycleState::Active,
                associated_role: None,
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for target in [RoleTarget::Student, RoleTarget::Staff, RoleTarget::Both] {
            let q = repos
                .questions()
                .create(NewQuestion {
                    text: format!("Q {}", target),
                    year: 1,
                    department_id: dept.id,
                    role_target: target,
                    status: LifecycleState::Active,
                    created_by: 1,
                })
                .await
                .unwrap();
            ids.push(q.id);
        }

        let student = repos
            .users()
            .create(NewUser {
                username: "s".into(),
                email: "s@example.edu".into(),
                password_hash: "x".into(),
                full_name: "S".into(),
                year: Some(1),
                sin_number: None,
                department_id: Some(dept.id),
                primary_role: Some(RoleKind::Student),
                roles: vec![RoleKind::Student],
            })
            .await
            .unwrap();

        Fixture {
            svc: FeedbackService::new(repos),
            student: AuthContext {
                user_id: student.id,
                authorities: student.authorities(),
                department_id: student.department_id,
                year: student.year,
            },
            q_student: ids[0],
            q_staff: ids[1],
            q_both: ids[2],
            department_id: dept.id,
        }
    }

    fn submit(question_id: i32, rating: i32) -> SubmitFeedback {
        SubmitFeedback {
            question_id,
            rating,
            notes: None,
        }
    }

    fn director(roles: &[RoleKind]) -> AuthContext {
        AuthContext {
            user_id: 100,
            authorities: roles.iter().copied().collect(),
            department_id: None,
            year: None,
        }
    }

    #[tokio::test]
    async fn student_submission_scenario() {
        let f = fixture().await;

        let first = f.svc.submit(&f.student, submit(f.q_student, 4)).await.unwrap();
        assert!(first.created);

        let err = f.svc.submit(&f.student, submit(f.q_staff, 2)).await.unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::RoleMismatch));

        let second = f.svc.submit(&f.student, submit(f.q_student, 5)).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.record.id, first.record.id);
        assert_eq!(second.record.rating.value(), 5);

        let mine = f.svc.mine(&f.student).await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn invalid_rating_and_missing_question() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.submit(&f.student, submit(f.q_both, 6)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            f.svc.submit(&f.student, submit(999, 3)).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn department_stats_over_mixed_ratings() {
        let f = fixture().await;
        f.svc.submit(&f.student, submit(f.q_student, 5)).await.unwrap();
        f.svc.submit(&f.student, submit(f.q_both, 1)).await.unwrap();

        let academic = director(&[RoleKind::AcademicDirector]);
        let stats = f.svc.department_stats(&academic, f.department_id).await.unwrap();
        assert_eq!(stats.total.count, 2);
        assert_eq!(stats.total.average, 3.0);
        assert_eq!(stats.questions.len(), 3);

        let err = f.svc.department_stats(&f.student, f.department_id).await.unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::RoleMismatch));
    }

    #[tokio::test]
    async fn overall_stats_are_executive_only() {
        let f = fixture().await;
        f.svc.submit(&f.student, submit(f.q_both, 3)).await.unwrap();

        let err = f
            .svc
            .overall_stats(&director(&[RoleKind::AcademicDirector]))
            .await
            .unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::RoleMismatch));

        let stats = f
            .svc
            .overall_stats(&director(&[RoleKind::ExecutiveDirector]))
            .await
            .unwrap();
        assert_eq!(stats.total.count, 1);
        assert_eq!(stats.departments.len(), 1);
    }

    #[tokio::test]
    async fn reading_feedback_of_others_needs_director() {
        let f = fixture().await;
        f.svc.submit(&f.student, submit(f.q_both, 3)).await.unwrap();

        let stranger = AuthContext {
            user_id: 77,
            ..f.student.clone()
        };
        let err = f.svc.by_user(&stranger, f.student.user_id).await.unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::SelfOnly));

        let own = f.svc.by_user(&f.student, f.student.user_id).await.unwrap();
        assert_eq!(own.len(), 1);

        let detail = f
            .svc
            .for_question(&director(&[RoleKind::AcademicDirector]), f.q_both)
            .await
            .unwrap();
        assert_eq!(detail.stats.count, 1);
        assert_eq!(detail.records.len(), 1);
    }
}
