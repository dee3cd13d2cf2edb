use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::database::store::WellnessStore;
use crate::error::{Error, Result};
use crate::models::answer::RawAnswer;
use crate::models::quiz_response::{QuizResponse, StoredAnswer};
use crate::models::user::Caller;
use crate::services::recommendation_service::RecommendationService;
use crate::services::scoring_service::ScoringService;
use crate::utils::time::Clock;

pub const DEFAULT_HISTORY_LIMIT: i64 = 30;
pub const MAX_HISTORY_LIMIT: i64 = 100;

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

/// Dashboard figures over a patient's recent responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub responses: usize,
    pub good_days: usize,
    pub average_score: Option<Decimal>,
    pub last_response_date: Option<NaiveDate>,
    pub last_recommendation: Option<String>,
}

impl HistorySummary {
    /// `history` must be most recent first.
    pub fn from_history(history: &[QuizResponse]) -> Self {
        let responses = history.len();
        let good_days = history
            .iter()
            .filter(|response| response.is_good_day_for_exercise)
            .count();
        let average_score = if responses == 0 {
            None
        } else {
            let total = history
                .iter()
                .try_fold(Decimal::ZERO, |total, response| {
                    total.checked_add(response.total_score)
                });
            if total.is_none() {
                tracing::warn!(responses, "score total overflowed, omitting average");
            }
            total
                .and_then(|total| total.checked_div(Decimal::from(responses as u64)))
                .map(|average| average.round_dp(2))
        };
        let latest = history.first();

        Self {
            responses,
            good_days,
            average_score,
            last_response_date: latest.map(|response| response.response_date),
            last_recommendation: latest.map(|response| response.recommended_exercise_type.clone()),
        }
    }
}

/// The daily check-in: one scored response per patient, quiz and calendar day.
pub struct SubmissionService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for SubmissionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: WellnessStore> SubmissionService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Scores `answers` against the current configuration of `quiz_id` and records the
    /// result. A second submission on the same day fails with
    /// [`Error::DuplicateSubmission`] carrying the response already on file.
    pub async fn submit_daily_response(
        &self,
        caller: &Caller,
        quiz_id: Uuid,
        answers: &[RawAnswer],
    ) -> Result<QuizResponse> {
        caller.require_patient()?;
        let user_id = caller.user_id;
        let today = self.clock.today();

        if let Some(existing) = self.store.response_for_day(user_id, quiz_id, today).await? {
            tracing::warn!(%user_id, %quiz_id, date = %today, "duplicate daily submission");
            return Err(Error::DuplicateSubmission(Box::new(existing)));
        }

        // Always score against the stored configuration, never a cached copy.
        let quiz = self
            .store
            .quiz_by_id(quiz_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))?;

        let validated = ScoringService::validate_answer_set(&quiz, answers)?;
        let total_score = ScoringService::score(&quiz, &validated)?;
        let recommendation = RecommendationService::resolve(total_score, &quiz.scoring_rules);

        let response = QuizResponse {
            id: Uuid::new_v4(),
            user_id,
            quiz_id,
            response_date: today,
            total_score,
            is_good_day_for_exercise: recommendation.is_good_day,
            recommended_exercise_type: recommendation.exercise_type,
            exercise_description: recommendation.description,
            answers: validated
                .into_iter()
                .map(|answer| StoredAnswer {
                    question_id: answer.question_id,
                    answer_value: answer.raw,
                })
                .collect(),
            created_at: self.clock.now(),
        };

        match self.store.insert_response(&response).await {
            Ok(()) => {}
            Err(Error::Conflict(_)) => {
                // Lost the race to a concurrent submission for the same day.
                let existing = self
                    .store
                    .response_for_day(user_id, quiz_id, today)
                    .await?
                    .ok_or_else(|| {
                        Error::Internal("conflicting response not found after insert".to_string())
                    })?;
                tracing::warn!(%user_id, %quiz_id, date = %today, "concurrent daily submission rejected");
                return Err(Error::DuplicateSubmission(Box::new(existing)));
            }
            Err(err) => return Err(err),
        }

        tracing::info!(
            response_id = %response.id,
            %user_id,
            %quiz_id,
            score = %response.total_score,
            good_day = response.is_good_day_for_exercise,
            exercise = %response.recommended_exercise_type,
            "daily response recorded"
        );
        Ok(response)
    }

    /// The caller's own responses, most recent first.
    pub async fn my_history(&self, caller: &Caller, limit: Option<i64>) -> Result<Vec<QuizResponse>> {
        self.store
            .responses_for_user(caller.user_id, clamp_limit(limit))
            .await
    }

    pub async fn patient_history(
        &self,
        caller: &Caller,
        patient_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<QuizResponse>> {
        caller.require_oncologist()?;
        self.store
            .responses_for_user(patient_id, clamp_limit(limit))
            .await
    }

    pub async fn today_response(
        &self,
        caller: &Caller,
        quiz_id: Uuid,
    ) -> Result<Option<QuizResponse>> {
        caller.require_patient()?;
        self.store
            .response_for_day(caller.user_id, quiz_id, self.clock.today())
            .await
    }

    pub async fn history_summary(&self, caller: &Caller) -> Result<HistorySummary> {
        let history = self
            .store
            .responses_for_user(caller.user_id, DEFAULT_HISTORY_LIMIT)
            .await?;
        Ok(HistorySummary::from_history(&history))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn response(day: u32, score: i64, good: bool) -> QuizResponse {
        QuizResponse {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            quiz_id: Uuid::nil(),
            response_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            total_score: Decimal::from(score),
            is_good_day_for_exercise: good,
            recommended_exercise_type: if good { "Walk" } else { "Rest" }.to_string(),
            exercise_description: None,
            answers: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None), 30);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(1000)), 100);
    }

    #[test]
    fn summary_of_empty_history() {
        let summary = HistorySummary::from_history(&[]);

        assert_eq!(summary.responses, 0);
        assert_eq!(summary.good_days, 0);
        assert_eq!(summary.average_score, None);
        assert_eq!(summary.last_response_date, None);
    }

    #[test]
    fn summary_counts_good_days_and_averages() {
        let history = vec![response(3, 70, true), response(2, 15, false), response(1, 50, true)];

        let summary = HistorySummary::from_history(&history);

        assert_eq!(summary.responses, 3);
        assert_eq!(summary.good_days, 2);
        assert_eq!(summary.average_score, Some(Decimal::from(45)));
        assert_eq!(summary.last_response_date, NaiveDate::from_ymd_opt(2024, 3, 3));
        assert_eq!(summary.last_recommendation.as_deref(), Some("Walk"));
    }

    #[test]
    fn summary_omits_average_instead_of_overflowing() {
        let mut huge = response(2, 0, true);
        huge.total_score = Decimal::MAX;
        let history = vec![huge.clone(), huge];

        let summary = HistorySummary::from_history(&history);

        assert_eq!(summary.responses, 2);
        assert_eq!(summary.good_days, 2);
        assert_eq!(summary.average_score, None);
    }
}
