use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::RawAnswer;
use crate::models::quiz_response::QuizResponse;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitDailyRequest {
    pub quiz_id: Uuid,
    #[validate(length(max = 200))]
    pub answers: Vec<RawAnswer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodayQuery {
    /// Defaults to the active quiz.
    pub quiz_id: Option<Uuid>,
}

/// Headline fields of a stored response, returned alongside duplicate-submission conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub response_date: NaiveDate,
    pub total_score: Decimal,
    pub is_good_day_for_exercise: bool,
    pub recommended_exercise_type: String,
    pub exercise_description: Option<String>,
}

impl From<&QuizResponse> for ResponseSummary {
    fn from(response: &QuizResponse) -> Self {
        Self {
            id: response.id,
            quiz_id: response.quiz_id,
            response_date: response.response_date,
            total_score: response.total_score,
            is_good_day_for_exercise: response.is_good_day_for_exercise,
            recommended_exercise_type: response.recommended_exercise_type.clone(),
            exercise_description: response.exercise_description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TodayResponse {
    pub quiz_id: Uuid,
    pub response: Option<QuizResponse>,
}
