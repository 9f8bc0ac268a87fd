//! Department DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::catalog::{CreateDepartment, UpdateDepartment};
use crate::domain::{Department, DomainResult, RoleKind};
use crate::interfaces::http::common::requested_status;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentDto {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `draft`, `active` or `retired`
    pub status: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Department> for DepartmentDto {
    fn from(d: Department) -> Self {
        Self {
            active: d.is_active(),
            status: d.status.as_str().to_string(),
            associated_role: d.associated_role.map(|r| r.as_str().to_string()),
            id: d.id,
            name: d.name,
            description: d.description,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Department reference embedded in user, question and feedback responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepartmentSummary {
    pub id: i32,
    pub name: String,
}

impl From<Department> for DepartmentSummary {
    fn from(d: Department) -> Self {
        Self { id: d.id, name: d.name }
    }
}

impl From<&Department> for DepartmentSummary {
    fn from(d: &Department) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    /// `draft`, `active` or `retired`; defaults to `active`
    pub status: Option<String>,
    pub active: Option<bool>,
    pub associated_role: Option<String>,
}

impl CreateDepartmentRequest {
    pub fn into_command(self) -> DomainResult<CreateDepartment> {
        Ok(CreateDepartment {
            status: requested_status(self.status.as_deref(), self.active)?,
            associated_role: self
                .associated_role
                .as_deref()
                .map(str::parse::<RoleKind>)
                .transpose()?,
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    pub status: Option<String>,
    pub active: Option<bool>,
}

impl UpdateDepartmentRequest {
    pub fn into_command(self) -> DomainResult<UpdateDepartment> {
        Ok(UpdateDepartment {
            status: requested_status(self.status.as_deref(), self.active)?,
            name: self.name,
            description: self.description,
        })
    }
}
