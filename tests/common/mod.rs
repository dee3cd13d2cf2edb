#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;
use wellness_backend::{
    database::{MemoryStore, WellnessStore},
    middleware::auth::Claims,
    models::{
        answer::RawAnswer,
        question::{Question, QuestionType},
        quiz::{Quiz, ScoringRule},
    },
    routes::{self, RouterSettings},
    utils::time::Clock,
    AppState,
};

pub const JWT_SECRET: &str = "test_secret_key";

/// Clock pinned to a settable calendar day.
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock().unwrap() = today;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.today().and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub state: AppState<MemoryStore>,
}

impl TestApp {
    pub fn new(bootstrap: bool) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(day(2024, 1, 1)));
        let state = AppState::new(
            Arc::clone(&store),
            Arc::clone(&clock) as Arc<dyn Clock>,
            bootstrap,
        );
        Self {
            store,
            clock,
            state,
        }
    }

    pub fn router(&self) -> Router {
        routes::router(
            self.state.clone(),
            &RouterSettings {
                jwt_secret: JWT_SECRET.to_string(),
                public_rps: 10_000,
                api_rps: 10_000,
            },
        )
    }
}

pub fn token(user_id: Uuid, role: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<JsonValue>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn decimal(value: &JsonValue) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .expect("valid decimal")
}

pub fn question(quiz_id: Uuid, question_type: QuestionType, weight: Decimal, order: i32) -> Question {
    Question {
        id: Uuid::new_v4(),
        quiz_id,
        text: format!("question {order}"),
        question_type,
        weight,
        order,
        options: Vec::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn rule(quiz_id: Uuid, min: i64, max: i64, good: bool, label: &str) -> ScoringRule {
    ScoringRule {
        id: Uuid::new_v4(),
        quiz_id,
        min_score: Decimal::from(min),
        max_score: Decimal::from(max),
        is_good_day: good,
        recommended_exercise_type: label.to_string(),
        exercise_description: None,
    }
}

/// Active quiz: a 0-10 scale (weight 2.0) then a yes/no (weight 1.0), with a two-tier table.
pub async fn seed_two_question_quiz(store: &MemoryStore) -> Quiz {
    let quiz_id = Uuid::new_v4();
    let quiz = Quiz {
        id: quiz_id,
        name: "Two questions".into(),
        description: None,
        is_active: true,
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        questions: vec![
            question(quiz_id, QuestionType::Scale0To10, Decimal::new(20, 1), 1),
            question(quiz_id, QuestionType::YesNo, Decimal::new(10, 1), 2),
        ],
        scoring_rules: vec![
            rule(quiz_id, 0, 20, false, "Rest"),
            rule(quiz_id, 20, 40, true, "Active Rest"),
        ],
    };
    store.insert_quiz(&quiz).await.expect("seed quiz");
    quiz
}

pub fn answers(quiz: &Quiz, values: &[&str]) -> Vec<RawAnswer> {
    quiz.questions
        .iter()
        .zip(values)
        .map(|(question, value)| RawAnswer {
            question_id: question.id,
            answer_value: value.to_string(),
        })
        .collect()
}
