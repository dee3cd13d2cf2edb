mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use common::{day, decimal, request, send, token, TestApp};

/// Builds an answer set from the served quiz: every scale at 5, every yes/no NO and the
/// first option of every multiple choice question.
fn baseline_answers(quiz: &JsonValue) -> Vec<JsonValue> {
    quiz["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| {
            let value = match q["type"].as_str().unwrap() {
                "SCALE_0_10" => "5".to_string(),
                "YES_NO" => "NO".to_string(),
                "MULTIPLE_CHOICE" => q["options"][0]["score_value"].as_str().unwrap().to_string(),
                other => panic!("unexpected question type {other}"),
            };
            json!({ "question_id": q["id"], "answer_value": value })
        })
        .collect()
}

async fn active_quiz(app: &axum::Router) -> JsonValue {
    let (status, body) = send(app, request(Method::GET, "/api/quizzes/active", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::new(false).router();

    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_quiz_id"], JsonValue::Null);
}

#[tokio::test]
async fn health_reports_active_quiz_and_store_outage() {
    let test_app = TestApp::new(true);
    let app = test_app.router();

    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active_quiz_id"], active_quiz(&app).await["id"]);

    test_app.state.quiz_service.invalidate();
    test_app.store.set_available(false);
    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn active_quiz_bootstraps_baseline() {
    let app = TestApp::new(true).router();

    let quiz = active_quiz(&app).await;

    assert_eq!(quiz["name"], "Daily Wellness Check");
    let questions = quiz["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[0]["order"], 1);
    assert_eq!(questions[3]["type"], "MULTIPLE_CHOICE");
    assert_eq!(questions[3]["options"][0]["score_value"], "2");

    let again = active_quiz(&app).await;
    assert_eq!(again["id"], quiz["id"]);
}

#[tokio::test]
async fn active_quiz_is_null_without_bootstrap() {
    let app = TestApp::new(false).router();

    assert_eq!(active_quiz(&app).await, JsonValue::Null);
}

#[tokio::test]
async fn submission_requires_a_valid_token() {
    let app = TestApp::new(true).router();
    let body = json!({ "quiz_id": Uuid::new_v4(), "answers": [] });

    let (status, json) = send(
        &app,
        request(Method::POST, "/api/responses/daily", None, Some(body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "missing_authorization");

    let (status, json) = send(
        &app,
        request(Method::POST, "/api/responses/daily", Some("not-a-jwt"), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "invalid_token");
}

#[tokio::test]
async fn oncologist_cannot_submit() {
    let app = TestApp::new(true).router();
    let quiz = active_quiz(&app).await;
    let doctor = token(Uuid::new_v4(), "ONCOLOGIST");

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/responses/daily",
            Some(&doctor),
            Some(json!({ "quiz_id": quiz["id"], "answers": baseline_answers(&quiz) })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn daily_check_in_flow() {
    let test_app = TestApp::new(true);
    let app = test_app.router();
    let quiz = active_quiz(&app).await;
    let patient = token(Uuid::new_v4(), "PATIENT");
    let payload = json!({ "quiz_id": quiz["id"], "answers": baseline_answers(&quiz) });

    let (status, created) = send(
        &app,
        request(Method::POST, "/api/responses/daily", Some(&patient), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(decimal(&created["total_score"]), Decimal::new(239, 1));
    assert_eq!(created["is_good_day_for_exercise"], true);
    assert_eq!(created["recommended_exercise_type"], "Active rest");
    assert_eq!(created["response_date"], "2024-01-01");

    let (status, conflict) = send(
        &app,
        request(Method::POST, "/api/responses/daily", Some(&patient), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["error"], "duplicate_submission");
    assert_eq!(conflict["existing"]["id"], created["id"]);

    let (status, today) = send(
        &app,
        request(Method::GET, "/api/responses/today", Some(&patient), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today["quiz_id"], quiz["id"]);
    assert_eq!(today["response"]["id"], created["id"]);

    test_app.clock.set_today(day(2024, 1, 2));
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/responses/daily", Some(&patient), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, history) = send(
        &app,
        request(Method::GET, "/api/responses/me?limit=1", Some(&patient), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["response_date"], "2024-01-02");

    let (status, summary) = send(
        &app,
        request(Method::GET, "/api/responses/me/summary", Some(&patient), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["responses"], 2);
    assert_eq!(summary["good_days"], 2);
    assert_eq!(decimal(&summary["average_score"]), Decimal::new(239, 1));
    assert_eq!(summary["last_response_date"], "2024-01-02");
}

#[tokio::test]
async fn incomplete_answer_set_is_rejected() {
    let test_app = TestApp::new(true);
    let app = test_app.router();
    let quiz = active_quiz(&app).await;
    let patient = token(Uuid::new_v4(), "PATIENT");

    let mut answers = baseline_answers(&quiz);
    let dropped = answers.pop().unwrap();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/responses/daily",
            Some(&patient),
            Some(json!({ "quiz_id": quiz["id"], "answers": answers })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_answers");
    assert_eq!(body["details"]["missing"], json!([dropped["question_id"]]));
    assert_eq!(test_app.store.response_count(), 0);
}

#[tokio::test]
async fn storage_outage_maps_to_service_unavailable() {
    let test_app = TestApp::new(true);
    let app = test_app.router();
    let quiz = active_quiz(&app).await;
    let patient = token(Uuid::new_v4(), "PATIENT");

    test_app.store.set_available(false);
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/responses/daily",
            Some(&patient),
            Some(json!({ "quiz_id": quiz["id"], "answers": baseline_answers(&quiz) })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "storage_unavailable");
}

#[tokio::test]
async fn patient_history_is_for_oncologists() {
    let app = TestApp::new(true).router();
    let patient_id = Uuid::new_v4();
    let uri = format!("/api/patients/{patient_id}/responses");

    let (status, _) = send(
        &app,
        request(Method::GET, &uri, Some(&token(patient_id, "PATIENT")), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(Method::GET, &uri, Some(&token(Uuid::new_v4(), "ONCOLOGIST")), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn clinician_quiz_changes_reach_patients() {
    let app = TestApp::new(true).router();
    let original = active_quiz(&app).await;
    let doctor = token(Uuid::new_v4(), "ONCOLOGIST");
    let new_quiz = json!({
        "name": "Post-chemo check",
        "is_active": true,
        "questions": [
            { "text": "Energy?", "type": "SCALE_0_10", "weight": "3" },
            {
                "text": "Appetite?",
                "type": "MULTIPLE_CHOICE",
                "weight": "1",
                "options": [
                    { "label": "None", "score_value": "0" },
                    { "label": "Normal", "score_value": "8.00" }
                ]
            }
        ],
        "scoring_rules": [
            { "min_score": "0", "max_score": "20", "is_good_day": false, "recommended_exercise_type": "Rest" },
            { "min_score": "20", "max_score": "40", "is_good_day": true, "recommended_exercise_type": "Walk" }
        ]
    });

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/admin/quizzes",
            Some(&token(Uuid::new_v4(), "PATIENT")),
            Some(new_quiz.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        request(Method::POST, "/api/admin/quizzes", Some(&doctor), Some(new_quiz)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_active"], true);

    let served = active_quiz(&app).await;
    assert_eq!(served["id"], created["id"]);
    assert_ne!(served["id"], original["id"]);
    assert_eq!(served["questions"][1]["options"][1]["score_value"], "8");

    let patient = token(Uuid::new_v4(), "PATIENT");
    let answers = json!([
        { "question_id": served["questions"][0]["id"], "answer_value": "4" },
        { "question_id": served["questions"][1]["id"], "answer_value": "8" }
    ]);
    let (status, response) = send(
        &app,
        request(
            Method::POST,
            "/api/responses/daily",
            Some(&patient),
            Some(json!({ "quiz_id": served["id"], "answers": answers })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(decimal(&response["total_score"]), Decimal::from(20));
    assert_eq!(response["recommended_exercise_type"], "Rest");

    let (status, activated) = send(
        &app,
        request(
            Method::POST,
            &format!("/api/admin/quizzes/{}/activate", original["id"].as_str().unwrap()),
            Some(&doctor),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(activated["id"], original["id"]);
    assert_eq!(active_quiz(&app).await["id"], original["id"]);
}

#[tokio::test]
async fn invalid_quiz_payload_is_unprocessable() {
    let app = TestApp::new(false).router();
    let doctor = token(Uuid::new_v4(), "ONCOLOGIST");

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/admin/quizzes",
            Some(&doctor),
            Some(json!({
                "name": "Broken",
                "questions": [{ "text": "Pick one", "type": "MULTIPLE_CHOICE", "weight": "1" }]
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/admin/quizzes",
            Some(&doctor),
            Some(json!({
                "name": "Too precise",
                "questions": [{ "text": "Energy?", "type": "SCALE_0_10", "weight": "1.234" }]
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn exercise_catalog() {
    let test_app = TestApp::new(false);
    test_app.state.exercise_service.ensure_baseline().await.unwrap();
    let app = test_app.router();

    let (status, all) = send(&app, request(Method::GET, "/api/exercises", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (status, light) = send(
        &app,
        request(Method::GET, "/api/exercises?intensity=LIGHT", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(light.as_array().unwrap().len(), 2);

    let doctor = token(Uuid::new_v4(), "ONCOLOGIST");
    let (status, created) = send(
        &app,
        request(
            Method::POST,
            "/api/admin/exercises",
            Some(&doctor),
            Some(json!({ "name": "Chair yoga", "intensity_level": "LIGHT" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/admin/exercises/{}", created["id"].as_str().unwrap());
    let (status, updated) = send(
        &app,
        request(
            Method::PATCH,
            &uri,
            Some(&doctor),
            Some(json!({ "intensity_level": "MODERATE" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["intensity_level"], "MODERATE");
    assert_eq!(updated["name"], "Chair yoga");

    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&doctor), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&doctor), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
