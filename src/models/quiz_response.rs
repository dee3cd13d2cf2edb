use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub question_id: Uuid,
    pub answer_value: String,
}

/// A patient's scored daily submission. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub response_date: NaiveDate,
    pub total_score: Decimal,
    pub is_good_day_for_exercise: bool,
    pub recommended_exercise_type: String,
    pub exercise_description: Option<String>,
    pub answers: Vec<StoredAnswer>,
    pub created_at: DateTime<Utc>,
}
