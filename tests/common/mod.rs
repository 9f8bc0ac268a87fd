//! Shared harness for HTTP integration tests
//!
//! Each `TestApp` owns a fresh in-memory SQLite database, migrated and wired
//! through the real router. Requests go through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use feedback_service::application::{AppServices, IdentitySettings};
use feedback_service::domain::RepositoryProvider;
use feedback_service::infrastructure::crypto::jwt::JwtConfig;
use feedback_service::infrastructure::database::migrator::Migrator;
use feedback_service::{create_api_router, init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub struct TestApp {
    pub router: Router,
    pub services: AppServices,
}

pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

impl Response {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn code(&self) -> Option<&str> {
        self.body["code"].as_str()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let db = init_database(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory database");
        Migrator::up(&db, None).await.expect("migrations");

        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        let services = AppServices::new(
            repos,
            IdentitySettings {
                jwt: JwtConfig::new("integration-test-secret", 1),
                bcrypt_cost: 4,
                allow_privileged_signup: true,
            },
        );
        let router = create_api_router(services.clone(), None);
        Self { router, services }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Response { status, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a user and returns its id.
    pub async fn signup(&self, profile: Value) -> i32 {
        let res = self
            .request(Method::POST, "/api/v1/auth/signup", None, Some(profile))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "signup failed: {}", res.body);
        res.data()["id"].as_i64().unwrap() as i32
    }

    pub async fn signin(&self, username: &str, password: &str) -> String {
        let res = self
            .request(
                Method::POST,
                "/api/v1/auth/signin",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "signin failed: {}", res.body);
        res.data()["token"].as_str().unwrap().to_string()
    }

    /// Signs up `username` with `roles` and returns `(id, token)`.
    pub async fn user(
        &self,
        username: &str,
        roles: &[&str],
        department_id: Option<i32>,
        year: Option<i32>,
    ) -> (i32, String) {
        let id = self
            .signup(json!({
                "username": username,
                "email": format!("{}@school.test", username),
                "password": "password123",
                "full_name": format!("{} Tester", username),
                "department_id": department_id,
                "year": year,
                "roles": roles,
            }))
            .await;
        let token = self.signin(username, "password123").await;
        (id, token)
    }

    pub async fn executive(&self) -> (i32, String) {
        self.user("exec", &["executive_director"], None, None).await
    }

    pub async fn department(&self, token: &str, name: &str) -> i32 {
        let res = self
            .post("/api/v1/departments", token, json!({ "name": name }))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "department failed: {}", res.body);
        res.data()["id"].as_i64().unwrap() as i32
    }

    pub async fn question(
        &self,
        token: &str,
        department_id: i32,
        year: i32,
        role_target: &str,
        text: &str,
    ) -> i32 {
        let res = self
            .post(
                "/api/v1/questions",
                token,
                json!({
                    "text": text,
                    "year": year,
                    "department_id": department_id,
                    "role_target": role_target,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "question failed: {}", res.body);
        res.data()["id"].as_i64().unwrap() as i32
    }
}
