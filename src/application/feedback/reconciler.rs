//! At most one feedback record per (user, question)
//!
//! The store's unique constraint is the arbiter: an insert that loses a race
//! comes back as `Conflict` and is replayed as an update of the winner's row.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::feedback::FeedbackRepository;
use crate::domain::{
    DomainError, DomainResult, Feedback, FeedbackRevision, NewFeedback, Rating,
};

#[derive(Debug, Clone)]
pub struct Submission {
    pub user_id: i32,
    pub question_id: i32,
    pub rating: Rating,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub record: Feedback,
    pub created: bool,
}

/// Blank notes count as absent.
fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

async fn revise(
    repo: &dyn FeedbackRepository,
    existing: Feedback,
    rating: Rating,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> DomainResult<Feedback> {
    let revision = FeedbackRevision {
        rating,
        notes: notes.or(existing.notes),
        submitted_at: now,
    };
    repo.update(existing.id, revision).await
}

pub async fn upsert(
    repo: &dyn FeedbackRepository,
    submission: Submission,
) -> DomainResult<SubmitOutcome> {
    let Submission {
        user_id,
        question_id,
        rating,
        notes,
    } = submission;
    let notes = normalize_notes(notes);
    let now = Utc::now();

    if let Some(existing) = repo.find_by_user_and_question(user_id, question_id).await? {
        let record = revise(repo, existing, rating, notes, now).await?;
        return Ok(SubmitOutcome {
            record,
            created: false,
        });
    }

    let insert = repo
        .insert(NewFeedback {
            user_id,
            question_id,
            rating,
            notes: notes.clone(),
            submitted_at: now,
        })
        .await;

    match insert {
        Ok(record) => Ok(SubmitOutcome {
            record,
            created: true,
        }),
        Err(DomainError::Conflict(_)) => {
            debug!(user_id, question_id, "Concurrent insert detected, retrying as update");
            let existing = repo
                .find_by_user_and_question(user_id, question_id)
                .await?
                .ok_or_else(|| {
                    DomainError::Internal(format!(
                        "Feedback for user {} and question {} conflicted but is missing",
                        user_id, question_id
                    ))
                })?;
            let record = revise(repo, existing, rating, notes, now).await?;
            Ok(SubmitOutcome {
                record,
                created: false,
            })
        }
        Err(e) => Err(e),
    }
}
