//! Department management

use std::sync::Arc;

use tracing::info;

use crate::application::access::{ensure, Action, AuthContext};
use crate::domain::{
    Department, DepartmentChanges, DomainError, DomainResult, LifecycleState, NewDepartment,
    RepositoryProvider, RoleKind,
};

#[derive(Debug, Clone, Default)]
pub struct CreateDepartment {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `Active`.
    pub status: Option<LifecycleState>,
    pub associated_role: Option<RoleKind>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<LifecycleState>,
}

pub struct DepartmentService {
    repos: Arc<dyn RepositoryProvider>,
}

fn clean_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("Department name is required".into()));
    }
    Ok(name.to_string())
}

impl DepartmentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self) -> DomainResult<Vec<Department>> {
        self.repos.departments().list().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Department> {
        self.repos
            .departments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Department", "id", id))
    }

    pub async fn create(&self, ctx: &AuthContext, command: CreateDepartment) -> DomainResult<Department> {
        ensure(ctx, Action::ManageDepartments)?;
        let name = clean_name(&command.name)?;

        if self.repos.departments().find_by_name(&name).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Department '{}' already exists",
                name
            )));
        }

        let department = self
            .repos
            .departments()
            .create(NewDepartment {
                name,
                description: command.description,
                status: command.status.unwrap_or(LifecycleState::Active),
                associated_role: command.associated_role,
            })
            .await?;

        info!(department_id = department.id, name = %department.name, "Department created");
        Ok(department)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i32,
        command: UpdateDepartment,
    ) -> DomainResult<Department> {
        ensure(ctx, Action::ManageDepartments)?;
        let current = self.get(id).await?;

        let name = command.name.as_deref().map(clean_name).transpose()?;
        if let Some(name) = &name {
            if let Some(other) = self.repos.departments().find_by_name(name).await? {
                if other.id != id {
                    return Err(DomainError::Conflict(format!(
                        "Department '{}' already exists",
                        name
                    )));
                }
            }
        }

        let status = command
            .status
            .map(|target| current.status.transition_to(target))
            .transpose()?;

        let department = self
            .repos
            .departments()
            .update(
                id,
                DepartmentChanges {
                    name,
                    description: command.description,
                    status,
                },
            )
            .await?;

        info!(department_id = id, status = %department.status, "Department updated");
        Ok(department)
    }

    /// Refused while users or questions still reference the department.
    pub async fn delete(&self, ctx: &AuthContext, id: i32) -> DomainResult<()> {
        ensure(ctx, Action::ManageDepartments)?;
        self.get(id).await?;

        let users = self.repos.users().count_in_department(id).await?;
        let questions = self.repos.questions().count_in_department(id).await?;
        if users > 0 || questions > 0 {
            return Err(DomainError::Conflict(format!(
                "Department {} still has {} users and {} questions",
                id, users, questions
            )));
        }

        self.repos.departments().delete(id).await?;
        info!(department_id = id, "Department deleted");
        Ok(())
    }
}
