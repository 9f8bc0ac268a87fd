//! Question API handlers
//!
//! Listing and single reads pass through the visibility filter; writes need
//! an academic or executive director.

use axum::{
    extract::{Path, Query, State},
    Extension,
};

use super::dto::{CreateQuestionRequest, ListQuestionsParams, QuestionDto, UpdateQuestionRequest};
use crate::application::{AppServices, AuthContext};
use crate::domain::Question;
use crate::interfaces::http::common::{
    created, ok, ApiReply, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};

/// Questions with their department summaries, read in one pass.
async fn to_dtos(
    services: &AppServices,
    questions: Vec<Question>,
) -> ApiResult<Vec<QuestionDto>> {
    let related = services.related.for_questions(&questions).await?;
    Ok(questions
        .into_iter()
        .map(|q| QuestionDto::with_related(q, &related))
        .collect())
}

async fn to_dto(services: &AppServices, question: Question) -> ApiResult<QuestionDto> {
    let related = services
        .related
        .for_questions(std::slice::from_ref(&question))
        .await?;
    Ok(QuestionDto::with_related(question, &related))
}

#[utoipa::path(
    post,
    path = "/api/v1/questions",
    tag = "Questions",
    security(("bearer_auth" = [])),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = ApiResponse<QuestionDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn create_question(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(request): ValidatedJson<CreateQuestionRequest>,
) -> ApiReply<QuestionDto> {
    let question = services
        .questions
        .create(&ctx, request.into_command()?)
        .await?;
    Ok(created(to_dto(&services, question).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/questions",
    tag = "Questions",
    security(("bearer_auth" = [])),
    params(ListQuestionsParams),
    responses(
        (status = 200, description = "Questions visible to the caller", body = ApiResponse<Vec<QuestionDto>>),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn list_questions(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListQuestionsParams>,
) -> ApiReply<Vec<QuestionDto>> {
    let questions = services.questions.list(&ctx, params.into()).await?;
    Ok(ok(to_dtos(&services, questions).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/questions/{id}",
    tag = "Questions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question details", body = ApiResponse<QuestionDto>),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn get_question(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> ApiReply<QuestionDto> {
    let question = services.questions.get(&ctx, id).await?;
    Ok(ok(to_dto(&services, question).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/questions/creator/{creator_id}",
    tag = "Questions",
    security(("bearer_auth" = [])),
    params(("creator_id" = i32, Path, description = "Creator user ID")),
    responses(
        (status = 200, description = "Questions authored by the user", body = ApiResponse<Vec<QuestionDto>>),
        (status = 403, description = "Directors only")
    )
)]
pub async fn list_by_creator(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(creator_id): Path<i32>,
) -> ApiReply<Vec<QuestionDto>> {
    let questions = services.questions.list_by_creator(&ctx, creator_id).await?;
    Ok(ok(to_dtos(&services, questions).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/questions/{id}",
    tag = "Questions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Question ID")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Question updated", body = ApiResponse<QuestionDto>),
        (status = 400, description = "Validation error or illegal status transition"),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_question(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateQuestionRequest>,
) -> ApiReply<QuestionDto> {
    let question = services
        .questions
        .update(&ctx, id, request.into_command()?)
        .await?;
    Ok(ok(to_dto(&services, question).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/questions/{id}",
    tag = "Questions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question and its feedback deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_question(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> ApiReply<EmptyData> {
    services.questions.delete(&ctx, id).await?;
    Ok(ok(EmptyData {}))
}
