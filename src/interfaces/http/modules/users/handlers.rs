//! User management API handlers
//!
//! Thin wrappers over `UserService`; the access policy runs inside the service.

use axum::{
    extract::{Path, Query, State},
    Extension,
};

use super::dto::{
    ChangePasswordRequest, ListUsersParams, ReassignRolesRequest, UpdateUserRequest, UserDto,
};
use crate::application::{AppServices, AuthContext};
use crate::domain::User;
use crate::interfaces::http::common::{
    ok, ApiReply, ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};

async fn with_department(services: &AppServices, user: User) -> ApiResult<UserDto> {
    let related = services.related.for_users(std::slice::from_ref(&user)).await?;
    Ok(UserDto::with_related(user, &related))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = ApiResponse<UserDto>),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn profile(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiReply<UserDto> {
    let user = services.users.profile(&ctx).await?;
    Ok(ok(with_department(&services, user).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 400, description = "Year out of range"),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn list_users(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListUsersParams>,
) -> ApiReply<PaginatedResponse<UserDto>> {
    let page = services.users.list(&ctx, params.into()).await?;
    let related = services.related.for_users(&page.items).await?;
    Ok(ok(PaginatedResponse::from_result(page, |u| {
        UserDto::with_related(u, &related)
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 403, description = "Not the caller and not a director"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> ApiReply<UserDto> {
    let user = services.users.get(&ctx, id).await?;
    Ok(ok(with_department(&services, user).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Username, email or SIN already taken")
    )
)]
pub async fn update_user(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiReply<UserDto> {
    let user = services.users.update(&ctx, id, request.into()).await?;
    Ok(ok(with_department(&services, user).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 400, description = "Current password is incorrect"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn change_password(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiReply<EmptyData> {
    services
        .users
        .change_password(&ctx, id, &request.current_password, &request.new_password)
        .await?;
    Ok(ok(EmptyData {}))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/roles",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = ReassignRolesRequest,
    responses(
        (status = 200, description = "Roles replaced", body = ApiResponse<UserDto>),
        (status = 400, description = "Unknown or empty role list"),
        (status = 403, description = "Executive director only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn reassign_roles(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ReassignRolesRequest>,
) -> ApiReply<UserDto> {
    let user = services.users.reassign_roles(&ctx, id, &request.roles).await?;
    Ok(ok(with_department(&services, user).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found"),
        (status = 409, description = "User still owns questions")
    )
)]
pub async fn delete_user(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> ApiReply<EmptyData> {
    services.users.delete(&ctx, id).await?;
    Ok(ok(EmptyData {}))
}
