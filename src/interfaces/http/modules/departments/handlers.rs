//! Department API handlers
//!
//! Reads are public; writes require a director.

use axum::{
    extract::{Path, State},
    Extension,
};

use super::dto::{CreateDepartmentRequest, DepartmentDto, UpdateDepartmentRequest};
use crate::application::{AppServices, AuthContext};
use crate::interfaces::http::common::{
    created, ok, ApiReply, ApiResponse, EmptyData, ValidatedJson,
};

#[utoipa::path(
    get,
    path = "/api/v1/departments",
    tag = "Departments",
    responses(
        (status = 200, description = "All departments, ordered by name", body = ApiResponse<Vec<DepartmentDto>>)
    )
)]
pub async fn list_departments(State(services): State<AppServices>) -> ApiReply<Vec<DepartmentDto>> {
    let departments = services.departments.list().await?;
    Ok(ok(departments.into_iter().map(DepartmentDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = ApiResponse<DepartmentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_department(
    State(services): State<AppServices>,
    Path(id): Path<i32>,
) -> ApiReply<DepartmentDto> {
    let department = services.departments.get(id).await?;
    Ok(ok(department.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/departments",
    tag = "Departments",
    security(("bearer_auth" = [])),
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = ApiResponse<DepartmentDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Directors only"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_department(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(request): ValidatedJson<CreateDepartmentRequest>,
) -> ApiReply<DepartmentDto> {
    let department = services
        .departments
        .create(&ctx, request.into_command()?)
        .await?;
    Ok(created(department.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Department ID")),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = ApiResponse<DepartmentDto>),
        (status = 400, description = "Validation error or illegal status transition"),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update_department(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateDepartmentRequest>,
) -> ApiReply<DepartmentDto> {
    let department = services
        .departments
        .update(&ctx, id, request.into_command()?)
        .await?;
    Ok(ok(department.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Department still has users or questions")
    )
)]
pub async fn delete_department(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> ApiReply<EmptyData> {
    services.departments.delete(&ctx, id).await?;
    Ok(ok(EmptyData {}))
}
