use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::question::QuestionRepository;
use crate::domain::{
    DomainError, DomainResult, NewQuestion, Question, QuestionChanges, QuestionFilter,
};
use crate::infrastructure::database::entities::enums::{LifecycleStatus, QuestionRole};
use crate::infrastructure::database::entities::{feedback, question};

pub struct SeaOrmQuestionRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: question::Model) -> Question {
    Question {
        id: model.id,
        text: model.text,
        year: model.year,
        department_id: model.department_id,
        role_target: model.role.into(),
        status: model.status.into(),
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Translates the listing predicate into a WHERE clause.
fn condition(filter: &QuestionFilter) -> Condition {
    let mut cond = Condition::all();
    if filter.active_only {
        cond = cond.add(question::Column::Status.eq(LifecycleStatus::Active));
    }
    if let Some(targets) = &filter.role_targets {
        let roles: Vec<QuestionRole> = targets.iter().map(|t| QuestionRole::from(*t)).collect();
        cond = cond.add(question::Column::Role.is_in(roles));
    }
    if let Some(department_id) = filter.department_id {
        cond = cond.add(question::Column::DepartmentId.eq(department_id));
    }
    if let Some(year) = filter.year {
        cond = cond.add(question::Column::Year.eq(year));
    }
    if let Some(created_by) = filter.created_by {
        cond = cond.add(question::Column::CreatedBy.eq(created_by));
    }
    cond
}

#[async_trait]
impl QuestionRepository for SeaOrmQuestionRepository {
    async fn create(&self, new: NewQuestion) -> DomainResult<Question> {
        let now = Utc::now();
        let model = question::ActiveModel {
            text: Set(new.text),
            year: Set(new.year),
            department_id: Set(new.department_id),
            role: Set(new.role_target.into()),
            status: Set(new.status.into()),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Question>> {
        let model = question::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = question::Entity::find()
            .filter(question::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn list(&self, filter: &QuestionFilter) -> DomainResult<Vec<Question>> {
        if filter.admits_nothing() {
            return Ok(Vec::new());
        }
        let models = question::Entity::find()
            .filter(condition(filter))
            .order_by_asc(question::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn list_by_departments(&self, department_ids: &[i32]) -> DomainResult<Vec<Question>> {
        if department_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = question::Entity::find()
            .filter(question::Column::DepartmentId.is_in(department_ids.to_vec()))
            .order_by_asc(question::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(&self, id: i32, changes: QuestionChanges) -> DomainResult<Question> {
        let existing = question::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Question", "id", id))?;

        let mut active = existing.into_active_model();
        if let Some(text) = changes.text {
            active.text = Set(text);
        }
        if let Some(year) = changes.year {
            active.year = Set(year);
        }
        if let Some(department_id) = changes.department_id {
            active.department_id = Set(department_id);
        }
        if let Some(role_target) = changes.role_target {
            active.role = Set(role_target.into());
        }
        if let Some(status) = changes.status {
            active.status = Set(status.into());
        }
        active.updated_at = Set(Utc::now());

        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(to_domain(saved))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        feedback::Entity::delete_many()
            .filter(feedback::Column::QuestionId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = question::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Question", "id", id));
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn count_in_department(&self, department_id: i32) -> DomainResult<u64> {
        question::Entity::find()
            .filter(question::Column::DepartmentId.eq(department_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
