use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use super::{db_err, is_missing_reference};
use crate::domain::feedback::FeedbackRepository;
use crate::domain::{
    DomainError, DomainResult, Feedback, FeedbackRevision, NewFeedback, Rating,
};
use crate::infrastructure::database::entities::{feedback, question};

pub struct SeaOrmFeedbackRepository {
    db: DatabaseConnection,
}

impl SeaOrmFeedbackRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Names the parent whose absence broke the insert.
    async fn missing_parent(&self, user_id: i32, question_id: i32) -> DomainError {
        match question::Entity::find_by_id(question_id).one(&self.db).await {
            Ok(Some(_)) => DomainError::not_found("User", "id", user_id),
            Ok(None) => DomainError::not_found("Question", "id", question_id),
            Err(e) => db_err(e),
        }
    }
}

fn to_domain(model: feedback::Model) -> DomainResult<Feedback> {
    let rating = Rating::new(model.rating).map_err(|_| {
        DomainError::Internal(format!(
            "Feedback {} holds out-of-range rating {}",
            model.id, model.rating
        ))
    })?;
    Ok(Feedback {
        id: model.id,
        user_id: model.user_id,
        question_id: model.question_id,
        rating,
        notes: model.notes,
        submitted_at: model.submitted_at,
    })
}

fn all_to_domain(models: Vec<feedback::Model>) -> DomainResult<Vec<Feedback>> {
    models.into_iter().map(to_domain).collect()
}

#[async_trait]
impl FeedbackRepository for SeaOrmFeedbackRepository {
    async fn find_by_user_and_question(
        &self,
        user_id: i32,
        question_id: i32,
    ) -> DomainResult<Option<Feedback>> {
        feedback::Entity::find()
            .filter(feedback::Column::UserId.eq(user_id))
            .filter(feedback::Column::QuestionId.eq(question_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_domain)
            .transpose()
    }

    async fn insert(&self, new: NewFeedback) -> DomainResult<Feedback> {
        let (user_id, question_id) = (new.user_id, new.question_id);
        let model = feedback::ActiveModel {
            rating: Set(new.rating.value()),
            notes: Set(new.notes),
            submitted_at: Set(new.submitted_at),
            user_id: Set(new.user_id),
            question_id: Set(new.question_id),
            ..Default::default()
        };
        // The (user_id, question_id) unique index turns a racing insert into Conflict
        match model.insert(&self.db).await {
            Ok(saved) => to_domain(saved),
            Err(e) if is_missing_reference(&e) => Err(self.missing_parent(user_id, question_id).await),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn update(&self, id: i32, revision: FeedbackRevision) -> DomainResult<Feedback> {
        let existing = feedback::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Feedback", "id", id))?;

        let mut active = existing.into_active_model();
        active.rating = Set(revision.rating.value());
        active.notes = Set(revision.notes);
        active.submitted_at = Set(revision.submitted_at);

        let saved = active.update(&self.db).await.map_err(db_err)?;
        to_domain(saved)
    }

    async fn list_by_user(&self, user_id: i32) -> DomainResult<Vec<Feedback>> {
        let models = feedback::Entity::find()
            .filter(feedback::Column::UserId.eq(user_id))
            .order_by_asc(feedback::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        all_to_domain(models)
    }

    async fn list_by_question(&self, question_id: i32) -> DomainResult<Vec<Feedback>> {
        let models = feedback::Entity::find()
            .filter(feedback::Column::QuestionId.eq(question_id))
            .order_by_asc(feedback::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        all_to_domain(models)
    }

    async fn list_by_questions(&self, question_ids: &[i32]) -> DomainResult<Vec<Feedback>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = feedback::Entity::find()
            .filter(feedback::Column::QuestionId.is_in(question_ids.to_vec()))
            .order_by_asc(feedback::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        all_to_domain(models)
    }

    async fn list_all(&self) -> DomainResult<Vec<Feedback>> {
        let models = feedback::Entity::find()
            .order_by_desc(feedback::Column::SubmittedAt)
            .order_by_desc(feedback::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        all_to_domain(models)
    }
}
