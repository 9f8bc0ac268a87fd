//! Feedback API handlers

use axum::{
    extract::{Path, State},
    Extension,
};

use super::dto::{
    to_dtos, DepartmentStatsDto, FeedbackDto, GlobalStatsDto, QuestionFeedbackDto,
    SubmitFeedbackRequest,
};
use crate::application::{AppServices, AuthContext, Include};
use crate::interfaces::http::common::{created, ok, ApiReply, ApiResponse, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/feedback/submit",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "First answer recorded", body = ApiResponse<FeedbackDto>),
        (status = 200, description = "Existing answer replaced", body = ApiResponse<FeedbackDto>),
        (status = 400, description = "Rating out of range or question inactive"),
        (status = 403, description = "Role or scope mismatch"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn submit_feedback(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(request): ValidatedJson<SubmitFeedbackRequest>,
) -> ApiReply<FeedbackDto> {
    let outcome = services.feedback.submit(&ctx, request.into()).await?;
    let dto = FeedbackDto::from(outcome.record);
    if outcome.created {
        Ok(created(dto))
    } else {
        Ok(ok(dto))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/feedback/mine",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's answers", body = ApiResponse<Vec<FeedbackDto>>)
    )
)]
pub async fn my_feedback(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiReply<Vec<FeedbackDto>> {
    let records = services.feedback.mine(&ctx).await?;
    let related = services.related.for_feedback(&records, Include::QUESTIONS).await?;
    Ok(ok(to_dtos(records, &related)))
}

#[utoipa::path(
    get,
    path = "/api/v1/feedback/user/{user_id}",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's answers", body = ApiResponse<Vec<FeedbackDto>>),
        (status = 403, description = "Not the caller and not a director")
    )
)]
pub async fn user_feedback(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(user_id): Path<i32>,
) -> ApiReply<Vec<FeedbackDto>> {
    let records = services.feedback.by_user(&ctx, user_id).await?;
    let related = services.related.for_feedback(&records, Include::QUESTIONS).await?;
    Ok(ok(to_dtos(records, &related)))
}

#[utoipa::path(
    get,
    path = "/api/v1/feedback/question/{question_id}",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    params(("question_id" = i32, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Statistics and answers", body = ApiResponse<QuestionFeedbackDto>),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn question_feedback(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(question_id): Path<i32>,
) -> ApiReply<QuestionFeedbackDto> {
    let result = services.feedback.for_question(&ctx, question_id).await?;
    let related = services
        .related
        .for_question_feedback(&result.question, &result.records)
        .await?;
    Ok(ok(QuestionFeedbackDto::with_related(result, &related)))
}

#[utoipa::path(
    get,
    path = "/api/v1/feedback/stats/department/{department_id}",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    params(("department_id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department statistics", body = ApiResponse<DepartmentStatsDto>),
        (status = 403, description = "Directors only"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn department_stats(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Path(department_id): Path<i32>,
) -> ApiReply<DepartmentStatsDto> {
    let stats = services.feedback.department_stats(&ctx, department_id).await?;
    Ok(ok(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/feedback/stats/overall",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Statistics across active departments", body = ApiResponse<GlobalStatsDto>),
        (status = 403, description = "Executive director only")
    )
)]
pub async fn overall_stats(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiReply<GlobalStatsDto> {
    let stats = services.feedback.overall_stats(&ctx).await?;
    Ok(ok(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/feedback/all",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every answer, newest first", body = ApiResponse<Vec<FeedbackDto>>),
        (status = 403, description = "Directors only")
    )
)]
pub async fn all_feedback(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiReply<Vec<FeedbackDto>> {
    let records = services.feedback.all(&ctx).await?;
    let related = services.related.for_feedback(&records, Include::ALL).await?;
    Ok(ok(to_dtos(records, &related)))
}
