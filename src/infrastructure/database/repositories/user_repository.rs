use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;

use super::db_err;
use crate::domain::user::UserRepository;
use crate::domain::{
    DomainError, DomainResult, NewUser, RoleKind, User, UserChanges, UserQuery,
};
use crate::infrastructure::database::entities::{feedback, question, user, user_role};
use crate::shared::PaginatedResult;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn role_ids_for(&self, user_ids: &[i32]) -> DomainResult<HashMap<i32, Vec<i32>>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = user_role::Entity::find()
            .filter(user_role::Column::UserId.is_in(user_ids.to_vec()))
            .order_by_asc(user_role::Column::RoleId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut grouped: HashMap<i32, Vec<i32>> = HashMap::new();
        for row in rows {
            grouped.entry(row.user_id).or_default().push(row.role_id);
        }
        Ok(grouped)
    }

    async fn hydrate(&self, model: user::Model) -> DomainResult<User> {
        let mut roles = self.role_ids_for(&[model.id]).await?;
        let ids = roles.remove(&model.id).unwrap_or_default();
        Ok(to_domain(model, ids))
    }

    async fn hydrate_one(&self, model: Option<user::Model>) -> DomainResult<Option<User>> {
        match model {
            Some(model) => self.hydrate(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_model(&self, id: i32) -> DomainResult<user::Model> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }
}

fn role_kind(id: i32) -> Option<RoleKind> {
    let kind = RoleKind::from_id(id);
    if kind.is_none() {
        warn!(role_id = id, "Ignoring unknown role id");
    }
    kind
}

fn to_domain(model: user::Model, role_ids: Vec<i32>) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        full_name: model.full_name,
        year: model.year,
        sin_number: model.sin_number,
        is_active: model.is_active,
        department_id: model.department_id,
        primary_role: model.role_id.and_then(role_kind),
        roles: role_ids.into_iter().filter_map(role_kind).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

async fn replace_roles(txn: &DatabaseTransaction, user_id: i32, roles: &[RoleKind]) -> DomainResult<()> {
    user_role::Entity::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(txn)
        .await
        .map_err(db_err)?;

    if roles.is_empty() {
        return Ok(());
    }
    let rows = roles.iter().map(|role| user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role.id()),
    });
    user_role::Entity::insert_many(rows)
        .exec(txn)
        .await
        .map_err(db_err)?;
    Ok(())
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = user::ActiveModel {
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            full_name: Set(new.full_name),
            year: Set(new.year),
            sin_number: Set(new.sin_number),
            is_active: Set(true),
            department_id: Set(new.department_id),
            role_id: Set(new.primary_role.map(RoleKind::id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        replace_roles(&txn, model.id, &new.roles).await?;
        txn.commit().await.map_err(db_err)?;

        let role_ids = new.roles.iter().map(|r| r.id()).collect();
        Ok(to_domain(model, role_ids))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_one(model).await
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let found: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut roles = self.role_ids_for(&found).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let role_ids = roles.remove(&m.id).unwrap_or_default();
                to_domain(m, role_ids)
            })
            .collect())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_one(model).await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_one(model).await
    }

    async fn find_by_sin_number(&self, sin_number: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::SinNumber.eq(sin_number))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_one(model).await
    }

    async fn list(&self, query: UserQuery) -> DomainResult<PaginatedResult<User>> {
        let mut select = user::Entity::find();
        if let Some(department_id) = query.department_id {
            select = select.filter(user::Column::DepartmentId.eq(department_id));
        }
        if let Some(year) = query.year {
            select = select.filter(user::Column::Year.eq(year));
        }

        let total = select.clone().count(&self.db).await.map_err(db_err)?;

        let p = query.pagination;
        let models = select
            .order_by_asc(user::Column::Id)
            .offset(p.offset())
            .limit(p.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut roles = self.role_ids_for(&ids).await?;
        let items = models
            .into_iter()
            .map(|m| {
                let role_ids = roles.remove(&m.id).unwrap_or_default();
                to_domain(m, role_ids)
            })
            .collect();

        Ok(PaginatedResult::new(items, total, p.page, p.limit))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> DomainResult<User> {
        let mut active = self.find_model(id).await?.into_active_model();

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(full_name) = changes.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(year) = changes.year {
            active.year = Set(Some(year));
        }
        if let Some(sin_number) = changes.sin_number {
            active.sin_number = Set(Some(sin_number));
        }
        if let Some(department_id) = changes.department_id {
            active.department_id = Set(Some(department_id));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let saved = active.update(&self.db).await.map_err(db_err)?;
        self.hydrate(saved).await
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> DomainResult<()> {
        let mut active = self.find_model(id).await?.into_active_model();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_roles(&self, id: i32, roles: Vec<RoleKind>) -> DomainResult<User> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut active = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?
            .into_active_model();
        active.role_id = Set(roles.first().map(|r| r.id()));
        active.updated_at = Set(Utc::now());
        let saved = active.update(&txn).await.map_err(db_err)?;

        replace_roles(&txn, id, &roles).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(to_domain(saved, roles.iter().map(|r| r.id()).collect()))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let owned = question::Entity::find()
            .filter(question::Column::CreatedBy.eq(id))
            .count(&txn)
            .await
            .map_err(db_err)?;
        if owned > 0 {
            return Err(DomainError::Conflict(format!(
                "User {} still owns {} questions and cannot be deleted",
                id, owned
            )));
        }

        feedback::Entity::delete_many()
            .filter(feedback::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", "id", id));
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn count_in_department(&self, department_id: i32) -> DomainResult<u64> {
        user::Entity::find()
            .filter(user::Column::DepartmentId.eq(department_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
