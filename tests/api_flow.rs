//! Authentication, user, department and question flows over HTTP

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new().await;
    let res = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"]["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let res = app
        .request(Method::GET, "/api-doc/openapi.json", None, None)
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["paths"]["/api/v1/feedback/submit"].is_object());
}

#[tokio::test]
async fn signup_defaults_to_student_and_signin_accepts_email() {
    let app = TestApp::new().await;
    let id = app
        .signup(json!({
            "username": "sam",
            "email": "sam@school.test",
            "password": "password123",
            "full_name": "Sam Student",
        }))
        .await;

    let res = app
        .request(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({ "username": "sam@school.test", "password": "password123" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["token_type"], "Bearer");
    assert_eq!(res.data()["user"]["id"], id);
    assert_eq!(res.data()["authorities"], json!(["ROLE_STUDENT"]));
}

#[tokio::test]
async fn signin_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.user("sam", &[], None, None).await;

    let res = app
        .request(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({ "username": "sam", "password": "not-it" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), Some("unauthenticated"));
}

#[tokio::test]
async fn signup_rejects_bad_input() {
    let app = TestApp::new().await;

    let invalid_email = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "username": "sam",
                "email": "not-an-email",
                "password": "password123",
                "full_name": "Sam",
            })),
        )
        .await;
    assert_eq!(invalid_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid_email.code(), Some("validation_error"));

    let unknown_role = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "username": "sam",
                "email": "sam@school.test",
                "password": "password123",
                "full_name": "Sam",
                "roles": ["janitor"],
            })),
        )
        .await;
    assert_eq!(unknown_role.status, StatusCode::BAD_REQUEST);

    let missing_department = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "username": "sam",
                "email": "sam@school.test",
                "password": "password123",
                "full_name": "Sam",
                "department_id": 999,
            })),
        )
        .await;
    assert_eq!(missing_department.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let app = TestApp::new().await;
    app.user("sam", &[], None, None).await;

    let res = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "username": "sam",
                "email": "other@school.test",
                "password": "password123",
                "full_name": "Other Sam",
            })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.code(), Some("conflict"));
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::new().await;

    let missing = app
        .request(Method::GET, "/api/v1/users/profile", None, None)
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["success"], false);

    let garbage = app.get("/api/v1/users/profile", "not.a.jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn legacy_access_token_header_is_accepted() {
    let app = TestApp::new().await;
    let (id, token) = app.user("sam", &[], None, None).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/users/profile")
        .header("x-access-token", token)
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["id"], id);
}

#[tokio::test]
async fn deleted_user_token_resolves_to_not_found() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let (id, token) = app.user("sam", &[], None, None).await;

    let res = app.delete(&format!("/api/v1/users/{}", id), &exec).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/api/v1/users/profile", &token).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_can_read_themselves_but_not_others() {
    let app = TestApp::new().await;
    let (sam_id, sam) = app.user("sam", &[], None, None).await;
    let (kim_id, _) = app.user("kim", &[], None, None).await;

    let own = app.get(&format!("/api/v1/users/{}", sam_id), &sam).await;
    assert_eq!(own.status, StatusCode::OK);

    let other = app.get(&format!("/api/v1/users/{}", kim_id), &sam).await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
    assert_eq!(other.code(), Some("self_only"));

    let listing = app.get("/api/v1/users", &sam).await;
    assert_eq!(listing.status, StatusCode::FORBIDDEN);
    assert_eq!(listing.code(), Some("role_mismatch"));
}

#[tokio::test]
async fn director_lists_users_with_filters() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let dept = app.department(&exec, "Physics").await;
    app.user("sam", &["student"], Some(dept), Some(2)).await;
    app.user("kim", &["student"], Some(dept), Some(3)).await;

    let res = app
        .get(&format!("/api/v1/users?department_id={}&year=2", dept), &exec)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["total"], 1);
    assert_eq!(res.data()["items"][0]["username"], "sam");

    let bad_year = app.get("/api/v1/users?year=9", &exec).await;
    assert_eq!(bad_year.status, StatusCode::BAD_REQUEST);

    let missing = app.get("/api/v1/users?department_id=999", &exec).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn password_change_checks_current_password() {
    let app = TestApp::new().await;
    let (id, token) = app.user("sam", &[], None, None).await;
    let uri = format!("/api/v1/users/{}/password", id);

    let wrong = app
        .put(
            &uri,
            &token,
            json!({ "current_password": "nope", "new_password": "fresh-secret" }),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);

    let ok = app
        .put(
            &uri,
            &token,
            json!({ "current_password": "password123", "new_password": "fresh-secret" }),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    app.signin("sam", "fresh-secret").await;
}

#[tokio::test]
async fn only_directors_toggle_account_status() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let (id, token) = app.user("sam", &[], None, None).await;
    let uri = format!("/api/v1/users/{}", id);

    let self_disable = app.put(&uri, &token, json!({ "is_active": false })).await;
    assert_eq!(self_disable.status, StatusCode::FORBIDDEN);

    let rename = app.put(&uri, &token, json!({ "full_name": "Samuel" })).await;
    assert_eq!(rename.status, StatusCode::OK);
    assert_eq!(rename.data()["full_name"], "Samuel");

    let disable = app.put(&uri, &exec, json!({ "is_active": false })).await;
    assert_eq!(disable.status, StatusCode::OK);

    let after = app.get("/api/v1/users/profile", &token).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_reassignment_is_executive_only() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let (_, academic) = app.user("ada", &["academic_director"], None, None).await;
    let (sam_id, _) = app.user("sam", &[], None, None).await;
    let uri = format!("/api/v1/users/{}/roles", sam_id);

    let denied = app
        .put(&uri, &academic, json!({ "roles": ["staff"] }))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.code(), Some("role_mismatch"));

    let empty = app.put(&uri, &exec, json!({ "roles": [] })).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let res = app
        .put(&uri, &exec, json!({ "roles": ["staff", "student"] }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["roles"], json!(["staff", "student"]));
}

#[tokio::test]
async fn department_lifecycle_and_conflicts() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let (_, student) = app.user("sam", &[], None, None).await;

    let forbidden = app
        .post("/api/v1/departments", &student, json!({ "name": "Art" }))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let dept = app.department(&exec, "Physics").await;
    let duplicate = app
        .post("/api/v1/departments", &exec, json!({ "name": "Physics" }))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    // Reads are public
    let listing = app
        .request(Method::GET, "/api/v1/departments", None, None)
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.data().as_array().unwrap().len(), 1);

    let uri = format!("/api/v1/departments/{}", dept);
    let retired = app.put(&uri, &exec, json!({ "status": "retired" })).await;
    assert_eq!(retired.status, StatusCode::OK);
    assert_eq!(retired.data()["active"], false);

    let back_to_draft = app.put(&uri, &exec, json!({ "status": "draft" })).await;
    assert_eq!(back_to_draft.status, StatusCode::BAD_REQUEST);

    let deleted = app.delete(&uri, &exec).await;
    assert_eq!(deleted.status, StatusCode::OK);
    let gone = app.request(Method::GET, &uri, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn department_with_members_cannot_be_deleted() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let dept = app.department(&exec, "Physics").await;
    app.user("sam", &[], Some(dept), Some(1)).await;

    let res = app
        .delete(&format!("/api/v1/departments/{}", dept), &exec)
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn question_listing_follows_role_department_and_year() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let physics = app.department(&exec, "Physics").await;
    let art = app.department(&exec, "Art").await;

    let for_students = app.question(&exec, physics, 2, "student", "Lectures?").await;
    let for_staff = app.question(&exec, physics, 2, "staff", "Workload?").await;
    let for_both = app.question(&exec, physics, 2, "both", "Facilities?").await;
    app.question(&exec, physics, 3, "student", "Other year").await;
    app.question(&exec, art, 2, "student", "Other department").await;

    let (_, student) = app.user("sam", &["student"], Some(physics), Some(2)).await;
    let (_, staff) = app.user("kim", &["staff"], Some(physics), Some(2)).await;

    let ids = |res: &common::Response| -> Vec<i64> {
        let mut ids: Vec<i64> = res
            .data()
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["id"].as_i64().unwrap())
            .collect();
        ids.sort();
        ids
    };

    let seen = app.get("/api/v1/questions", &student).await;
    assert_eq!(seen.status, StatusCode::OK);
    assert_eq!(ids(&seen), vec![for_students as i64, for_both as i64]);

    let seen = app.get("/api/v1/questions", &staff).await;
    assert_eq!(ids(&seen), vec![for_staff as i64, for_both as i64]);

    // Hidden questions read as missing
    let hidden = app
        .get(&format!("/api/v1/questions/{}", for_students), &staff)
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    // Another department yields an empty list, not an error
    let elsewhere = app
        .get(&format!("/api/v1/questions?department_id={}", art), &student)
        .await;
    assert_eq!(elsewhere.status, StatusCode::OK);
    assert!(elsewhere.data().as_array().unwrap().is_empty());

    let all = app.get("/api/v1/questions", &exec).await;
    assert_eq!(all.data().as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn question_management_requires_director() {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let dept = app.department(&exec, "Physics").await;
    let (_, academic) = app.user("ada", &["academic_director"], None, None).await;
    let (_, student) = app.user("sam", &[], Some(dept), Some(1)).await;

    let body = json!({ "text": "Rate the lab", "year": 1, "department_id": dept });
    let denied = app.post("/api/v1/questions", &student, body.clone()).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = app.post("/api/v1/questions", &academic, body).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["role_target"], "both");
    assert_eq!(created.data()["active"], true);
    let id = created.data()["id"].as_i64().unwrap();

    let bad_year = app
        .post(
            "/api/v1/questions",
            &academic,
            json!({ "text": "Too late", "year": 6, "department_id": dept }),
        )
        .await;
    assert_eq!(bad_year.status, StatusCode::BAD_REQUEST);

    let no_department = app
        .post(
            "/api/v1/questions",
            &academic,
            json!({ "text": "Nowhere", "year": 1, "department_id": 999 }),
        )
        .await;
    assert_eq!(no_department.status, StatusCode::NOT_FOUND);

    let updated = app
        .put(
            &format!("/api/v1/questions/{}", id),
            &academic,
            json!({ "role_target": "staff", "active": false }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["role_target"], "staff");
    assert_eq!(updated.data()["active"], false);

    let academic_id = app.get("/api/v1/users/profile", &academic).await.data()["id"]
        .as_i64()
        .unwrap();
    let by_creator = app
        .get(&format!("/api/v1/questions/creator/{}", academic_id), &exec)
        .await;
    assert_eq!(by_creator.status, StatusCode::OK);
    assert_eq!(by_creator.data().as_array().unwrap().len(), 1);

    let deleted = app
        .delete(&format!("/api/v1/questions/{}", id), &academic)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me");
}
