//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::EmptyData;
use super::middleware::{auth_middleware, AuthState, LEGACY_TOKEN_HEADER};
use super::modules::{auth, departments, feedback, health, metrics, questions, users};
use super::request_id::request_id_middleware;
use crate::application::AppServices;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "access_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(LEGACY_TOKEN_HEADER))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::signin,
        users::profile,
        users::list_users,
        users::get_user,
        users::update_user,
        users::change_password,
        users::reassign_roles,
        users::delete_user,
        departments::list_departments,
        departments::get_department,
        departments::create_department,
        departments::update_department,
        departments::delete_department,
        questions::create_question,
        questions::list_questions,
        questions::get_question,
        questions::list_by_creator,
        questions::update_question,
        questions::delete_question,
        feedback::submit_feedback,
        feedback::my_feedback,
        feedback::user_feedback,
        feedback::question_feedback,
        feedback::department_stats,
        feedback::overall_stats,
        feedback::all_feedback,
    ),
    components(
        schemas(
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            auth::SignupRequest,
            auth::SigninRequest,
            auth::SigninResponse,
            users::UserDto,
            users::UserSummary,
            users::UpdateUserRequest,
            users::ChangePasswordRequest,
            users::ReassignRolesRequest,
            departments::DepartmentDto,
            departments::DepartmentSummary,
            departments::CreateDepartmentRequest,
            departments::UpdateDepartmentRequest,
            questions::QuestionDto,
            questions::QuestionSummary,
            questions::CreateQuestionRequest,
            questions::UpdateQuestionRequest,
            feedback::SubmitFeedbackRequest,
            feedback::FeedbackDto,
            feedback::RatingStatsDto,
            feedback::QuestionStatsDto,
            feedback::DepartmentStatsDto,
            feedback::GlobalStatsDto,
            feedback::QuestionFeedbackDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and storage connectivity"),
        (name = "Authentication", description = "Sign-up and sign-in (JWT)"),
        (name = "Users", description = "Profiles, password changes and role assignment"),
        (name = "Departments", description = "Department catalogue and lifecycle"),
        (name = "Questions", description = "Question catalogue, filtered by the caller's role, department and year"),
        (name = "Feedback", description = "Rating submission, history and statistics"),
    ),
    info(
        title = "Feedback Service API",
        version = "1.0.0",
        description = "REST API for collecting and analysing student and staff feedback",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is mounted only when a Prometheus recorder handle is supplied.
pub fn create_api_router(services: AppServices, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_state = AuthState {
        resolver: services.resolver.clone(),
    };
    let health_state = health::HealthState {
        repos: services.repos.clone(),
        started_at: Arc::new(Instant::now()),
    };

    let public_routes = Router::new()
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/signin", post(auth::signin))
        .route("/api/v1/departments", get(departments::list_departments))
        .route("/api/v1/departments/{id}", get(departments::get_department));

    let protected_routes = Router::new()
        // Users
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/users/profile", get(users::profile))
        .route(
            "/api/v1/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/v1/users/{id}/password", put(users::change_password))
        .route("/api/v1/users/{id}/roles", put(users::reassign_roles))
        // Departments (writes)
        .route("/api/v1/departments", post(departments::create_department))
        .route(
            "/api/v1/departments/{id}",
            put(departments::update_department).delete(departments::delete_department),
        )
        // Questions
        .route(
            "/api/v1/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/api/v1/questions/{id}",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route(
            "/api/v1/questions/creator/{creator_id}",
            get(questions::list_by_creator),
        )
        // Feedback
        .route("/api/v1/feedback/submit", post(feedback::submit_feedback))
        .route("/api/v1/feedback/mine", get(feedback::my_feedback))
        .route("/api/v1/feedback/user/{user_id}", get(feedback::user_feedback))
        .route(
            "/api/v1/feedback/question/{question_id}",
            get(feedback::question_feedback),
        )
        .route(
            "/api/v1/feedback/stats/department/{department_id}",
            get(feedback::department_stats),
        )
        .route("/api/v1/feedback/stats/overall", get(feedback::overall_stats))
        .route("/api/v1/feedback/all", get(feedback::all_feedback))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let api_routes = public_routes
        .merge(protected_routes)
        .with_state(services);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(api_routes);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
