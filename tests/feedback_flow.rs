//! Feedback submission and statistics over HTTP

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

struct Campus {
    app: TestApp,
    exec: String,
    dept: i32,
    q_student: i32,
    q_staff: i32,
    q_both: i32,
    student_id: i32,
    student: String,
}

/// Department D with Q1 (student), Q2 (staff), Q3 (both), all year 2,
/// and a year-2 student S in D.
async fn campus() -> Campus {
    let app = TestApp::new().await;
    let (_, exec) = app.executive().await;
    let dept = app.department(&exec, "Physics").await;
    let q_student = app.question(&exec, dept, 2, "student", "Q1").await;
    let q_staff = app.question(&exec, dept, 2, "staff", "Q2").await;
    let q_both = app.question(&exec, dept, 2, "both", "Q3").await;
    let (student_id, student) = app.user("sam", &["student"], Some(dept), Some(2)).await;
    Campus {
        app,
        exec,
        dept,
        q_student,
        q_staff,
        q_both,
        student_id,
        student,
    }
}

fn submission(question_id: i32, rating: i32) -> serde_json::Value {
    json!({ "question_id": question_id, "rating": rating })
}

#[tokio::test]
async fn student_submission_scenario() {
    let c = campus().await;
    let app = &c.app;

    let first = app
        .post("/api/v1/feedback/submit", &c.student, submission(c.q_student, 4))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.data()["rating"], 4);

    let wrong_role = app
        .post("/api/v1/feedback/submit", &c.student, submission(c.q_staff, 2))
        .await;
    assert_eq!(wrong_role.status, StatusCode::FORBIDDEN);
    assert_eq!(wrong_role.code(), Some("role_mismatch"));

    let revised = app
        .post("/api/v1/feedback/submit", &c.student, submission(c.q_student, 5))
        .await;
    assert_eq!(revised.status, StatusCode::OK);
    assert_eq!(revised.data()["id"], first.data()["id"]);
    assert_eq!(revised.data()["rating"], 5);

    let mine = app.get("/api/v1/feedback/mine", &c.student).await;
    assert_eq!(mine.status, StatusCode::OK);
    let records = mine.data().as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["rating"], 5);
}

#[tokio::test]
async fn resubmitting_keeps_notes_unless_new_ones_are_given() {
    let c = campus().await;
    let app = &c.app;

    app.post(
        "/api/v1/feedback/submit",
        &c.student,
        json!({ "question_id": c.q_both, "rating": 3, "notes": "too fast" }),
    )
    .await;

    let blank = app
        .post(
            "/api/v1/feedback/submit",
            &c.student,
            json!({ "question_id": c.q_both, "rating": 4, "notes": "  " }),
        )
        .await;
    assert_eq!(blank.status, StatusCode::OK);
    assert_eq!(blank.data()["notes"], "too fast");

    let replaced = app
        .post(
            "/api/v1/feedback/submit",
            &c.student,
            json!({ "question_id": c.q_both, "rating": 4, "notes": "better now" }),
        )
        .await;
    assert_eq!(replaced.data()["notes"], "better now");
}

#[tokio::test]
async fn submission_preconditions_map_to_statuses() {
    let c = campus().await;
    let app = &c.app;

    let missing = app
        .post("/api/v1/feedback/submit", &c.student, submission(999, 3))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let out_of_range = app
        .post("/api/v1/feedback/submit", &c.student, submission(c.q_student, 6))
        .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);

    let other_year = app.question(&c.exec, c.dept, 3, "student", "Year 3").await;
    let scope = app
        .post("/api/v1/feedback/submit", &c.student, submission(other_year, 3))
        .await;
    assert_eq!(scope.status, StatusCode::FORBIDDEN);
    assert_eq!(scope.code(), Some("scope_mismatch"));

    let retired = app
        .put(
            &format!("/api/v1/questions/{}", c.q_student),
            &c.exec,
            json!({ "status": "retired" }),
        )
        .await;
    assert_eq!(retired.status, StatusCode::OK);
    let inactive = app
        .post("/api/v1/feedback/submit", &c.student, submission(c.q_student, 3))
        .await;
    assert_eq!(inactive.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_cannot_answer_student_questions() {
    let c = campus().await;
    let app = &c.app;
    let (ada_id, staff) = app.user("ada", &["staff"], Some(c.dept), Some(2)).await;

    let res = app
        .post("/api/v1/feedback/submit", &staff, submission(c.q_student, 3))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), Some("role_mismatch"));

    let ok = app
        .post("/api/v1/feedback/submit", &staff, submission(c.q_staff, 3))
        .await;
    assert_eq!(ok.status, StatusCode::CREATED);
    assert_eq!(ok.data()["user_id"], ada_id);
}

#[tokio::test]
async fn feedback_history_access() {
    let c = campus().await;
    let app = &c.app;
    let (kim_id, kim) = app.user("kim", &["student"], Some(c.dept), Some(2)).await;
    app.post("/api/v1/feedback/submit", &kim, submission(c.q_both, 2))
        .await;

    let own = app
        .get(&format!("/api/v1/feedback/user/{}", kim_id), &kim)
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.data().as_array().unwrap().len(), 1);

    let other = app
        .get(&format!("/api/v1/feedback/user/{}", kim_id), &c.student)
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);

    let director = app
        .get(&format!("/api/v1/feedback/user/{}", kim_id), &c.exec)
        .await;
    assert_eq!(director.status, StatusCode::OK);

    let all_denied = app.get("/api/v1/feedback/all", &c.student).await;
    assert_eq!(all_denied.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn all_feedback_is_newest_first() {
    let c = campus().await;
    let app = &c.app;
    let (_, kim) = app.user("kim", &["student"], Some(c.dept), Some(2)).await;

    let older = app
        .post("/api/v1/feedback/submit", &c.student, submission(c.q_both, 3))
        .await;
    let newer = app
        .post("/api/v1/feedback/submit", &kim, submission(c.q_both, 4))
        .await;

    let all = app.get("/api/v1/feedback/all", &c.exec).await;
    assert_eq!(all.status, StatusCode::OK);
    let records = all.data().as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], newer.data()["id"]);
    assert_eq!(records[1]["id"], older.data()["id"]);
}

#[tokio::test]
async fn department_statistics_aggregate_ratings() {
    let c = campus().await;
    let app = &c.app;
    let (_, kim) = app.user("kim", &["student"], Some(c.dept), Some(2)).await;
    let (_, lee) = app.user("lee", &["student"], Some(c.dept), Some(2)).await;

    app.post("/api/v1/feedback/submit", &c.student, submission(c.q_both, 5))
        .await;
    app.post("/api/v1/feedback/submit", &kim, submission(c.q_both, 5))
        .await;
    app.post("/api/v1/feedback/submit", &lee, submission(c.q_both, 1))
        .await;

    let stats = app
        .get(
            &format!("/api/v1/feedback/stats/department/{}", c.dept),
            &c.exec,
        )
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    let total = &stats.data()["total"];
    assert_eq!(total["count"], 3);
    assert_eq!(total["average"], 3.67);
    assert_eq!(
        total["distribution"],
        json!({ "1": 1, "2": 0, "3": 0, "4": 0, "5": 2 })
    );

    let per_question = stats.data()["questions"].as_array().unwrap();
    assert_eq!(per_question.len(), 3);
    let q3 = per_question
        .iter()
        .find(|q| q["question_id"] == c.q_both)
        .unwrap();
    assert_eq!(q3["stats"]["count"], 3);

    let denied = app
        .get(
            &format!("/api/v1/feedback/stats/department/{}", c.dept),
            &c.student,
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn question_feedback_includes_stats_and_records() {
    let c = campus().await;
    let app = &c.app;
    app.post("/api/v1/feedback/submit", &c.student, submission(c.q_student, 4))
        .await;

    let res = app
        .get(
            &format!("/api/v1/feedback/question/{}", c.q_student),
            &c.exec,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["question"]["id"], c.q_student);
    assert_eq!(res.data()["stats"]["count"], 1);
    assert_eq!(res.data()["stats"]["average"], 4.0);
    assert_eq!(res.data()["records"][0]["user_id"], c.student_id);
}

#[tokio::test]
async fn overall_statistics_are_executive_only() {
    let c = campus().await;
    let app = &c.app;
    let (_, academic) = app.user("ada", &["academic_director"], None, None).await;
    app.post("/api/v1/feedback/submit", &c.student, submission(c.q_both, 2))
        .await;

    let denied = app.get("/api/v1/feedback/stats/overall", &academic).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.code(), Some("role_mismatch"));

    let res = app.get("/api/v1/feedback/stats/overall", &c.exec).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["total"]["count"], 1);
    assert_eq!(res.data()["departments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_question_removes_its_feedback() {
    let c = campus().await;
    let app = &c.app;
    app.post("/api/v1/feedback/submit", &c.student, submission(c.q_both, 4))
        .await;

    let deleted = app
        .delete(&format!("/api/v1/questions/{}", c.q_both), &c.exec)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let mine = app.get("/api/v1/feedback/mine", &c.student).await;
    assert!(mine.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn own_history_embeds_the_answered_question() {
    let c = campus().await;
    let app = &c.app;
    app.post("/api/v1/feedback/submit", &c.student, submission(c.q_student, 4))
        .await;

    let mine = app.get("/api/v1/feedback/mine", &c.student).await;
    let record = &mine.data()[0];
    assert_eq!(record["question"]["id"], c.q_student);
    assert_eq!(record["question"]["text"], "Q1");
    assert_eq!(record["question"]["year"], 2);
    assert_eq!(record["question"]["department"]["id"], c.dept);
    assert_eq!(record["question"]["department"]["name"], "Physics");
    assert!(record.get("user").is_none());

    let by_user = app
        .get(&format!("/api/v1/feedback/user/{}", c.student_id), &c.exec)
        .await;
    assert_eq!(by_user.data()[0]["question"]["text"], "Q1");
}

#[tokio::test]
async fn director_listings_name_the_submitter() {
    let c = campus().await;
    let app = &c.app;
    app.post("/api/v1/feedback/submit", &c.student, submission(c.q_both, 2))
        .await;

    let all = app.get("/api/v1/feedback/all", &c.exec).await;
    let record = &all.data()[0];
    assert_eq!(record["user"]["id"], c.student_id);
    assert_eq!(record["user"]["username"], "sam");
    assert_eq!(record["user"]["full_name"], "sam Tester");
    assert_eq!(record["user"]["year"], 2);
    assert_eq!(record["user"]["department_id"], c.dept);
    assert_eq!(record["user"]["department"]["name"], "Physics");
    assert_eq!(record["question"]["text"], "Q3");

    let detail = app
        .get(&format!("/api/v1/feedback/question/{}", c.q_both), &c.exec)
        .await;
    assert_eq!(detail.data()["question"]["department"]["name"], "Physics");
    let answer = &detail.data()["records"][0];
    assert_eq!(answer["user"]["username"], "sam");
    assert_eq!(answer["user"]["department"]["id"], c.dept);
    assert!(answer.get("question").is_none());
}

#[tokio::test]
async fn questions_and_profiles_carry_their_department() {
    let c = campus().await;
    let app = &c.app;

    let listed = app.get("/api/v1/questions", &c.student).await;
    let questions = listed.data().as_array().unwrap().clone();
    assert!(!questions.is_empty());
    for q in &questions {
        assert_eq!(q["department"]["name"], "Physics");
    }

    let single = app
        .get(&format!("/api/v1/questions/{}", c.q_student), &c.student)
        .await;
    assert_eq!(single.data()["department"]["id"], c.dept);

    let profile = app.get("/api/v1/users/profile", &c.student).await;
    assert_eq!(profile.data()["department"]["name"], "Physics");

    let by_id = app
        .get(&format!("/api/v1/users/{}", c.student_id), &c.exec)
        .await;
    assert_eq!(by_id.data()["department"]["id"], c.dept);

    let exec_profile = app.get("/api/v1/users/profile", &c.exec).await;
    assert!(exec_profile.data().get("department").is_none());
}
