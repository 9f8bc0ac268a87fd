use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use super::db_err;
use crate::domain::department::DepartmentRepository;
use crate::domain::{
    Department, DepartmentChanges, DomainError, DomainResult, NewDepartment, RoleKind,
};
use crate::infrastructure::database::entities::department;
use crate::infrastructure::database::entities::enums::LifecycleStatus;

pub struct SeaOrmDepartmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmDepartmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: department::Model) -> Department {
    Department {
        id: model.id,
        name: model.name,
        description: model.description,
        status: model.status.into(),
        associated_role: model.role_id.and_then(RoleKind::from_id),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl DepartmentRepository for SeaOrmDepartmentRepository {
    async fn create(&self, new: NewDepartment) -> DomainResult<Department> {
        let now = Utc::now();
        let model = department::ActiveModel {
            name: Set(new.name),
            description: Set(new.description),
            status: Set(LifecycleStatus::from(new.status)),
            role_id: Set(new.associated_role.map(RoleKind::id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Department>> {
        let model = department::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Department>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = department::Entity::find()
            .filter(department::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Department>> {
        let model = department::Entity::find()
            .filter(department::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(to_domain))
    }

    async fn list(&self) -> DomainResult<Vec<Department>> {
        let models = department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn list_active(&self) -> DomainResult<Vec<Department>> {
        let models = department::Entity::find()
            .filter(department::Column::Status.eq(LifecycleStatus::Active))
            .order_by_asc(department::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(&self, id: i32, changes: DepartmentChanges) -> DomainResult<Department> {
        let existing = department::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Department", "id", id))?;

        let mut active = existing.into_active_model();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.into());
        }
        active.updated_at = Set(Utc::now());

        let saved = active.update(&self.db).await.map_err(db_err)?;
        Ok(to_domain(saved))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = department::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Department", "id", id));
        }
        Ok(())
    }
}
