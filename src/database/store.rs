use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::models::exercise::{ExerciseTutorial, ExerciseUpdate, IntensityLevel};
use crate::models::question::{Question, QuestionUpdate};
use crate::models::quiz::{Quiz, ScoringRule};
use crate::models::quiz_response::QuizResponse;

/// Persistence boundary for the wellness check-in.
///
/// Quizzes and responses are read and written as whole aggregates. Implementations must
/// guarantee that:
/// * at most one quiz is active; inserting or activating a quiz deactivates the others in
///   the same unit of work,
/// * a response and its answers are stored together or not at all,
/// * a second response for the same `(user_id, quiz_id, response_date)` fails with
///   [`Error::Conflict`](crate::error::Error::Conflict).
pub trait WellnessStore: Send + Sync + 'static {
    fn active_quiz(&self) -> impl Future<Output = Result<Option<Quiz>>> + Send;

    fn quiz_by_id(&self, quiz_id: Uuid) -> impl Future<Output = Result<Option<Quiz>>> + Send;

    fn list_quizzes(&self) -> impl Future<Output = Result<Vec<Quiz>>> + Send;

    fn insert_quiz(&self, quiz: &Quiz) -> impl Future<Output = Result<()>> + Send;

    /// Inserts `quiz` as the active quiz only if no quiz is active yet. Returns `false`
    /// (and writes nothing) when another quiz is already active.
    fn bootstrap_quiz(&self, quiz: &Quiz) -> impl Future<Output = Result<bool>> + Send;

    /// Returns `false` when the quiz does not exist.
    fn activate_quiz(&self, quiz_id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    fn insert_question(&self, question: &Question) -> impl Future<Output = Result<()>> + Send;

    fn update_question(
        &self,
        question_id: Uuid,
        update: &QuestionUpdate,
    ) -> impl Future<Output = Result<Option<Question>>> + Send;

    fn delete_question(&self, question_id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    fn replace_scoring_rules(
        &self,
        quiz_id: Uuid,
        rules: &[ScoringRule],
    ) -> impl Future<Output = Result<()>> + Send;

    fn response_for_day(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<QuizResponse>>> + Send;

    fn insert_response(&self, response: &QuizResponse) -> impl Future<Output = Result<()>> + Send;

    /// Most recent first.
    fn responses_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<QuizResponse>>> + Send;

    fn list_exercises(
        &self,
        intensity: Option<IntensityLevel>,
    ) -> impl Future<Output = Result<Vec<ExerciseTutorial>>> + Send;

    fn count_exercises(&self) -> impl Future<Output = Result<i64>> + Send;

    fn insert_exercises(
        &self,
        exercises: &[ExerciseTutorial],
    ) -> impl Future<Output = Result<()>> + Send;

    fn update_exercise(
        &self,
        exercise_id: Uuid,
        update: &ExerciseUpdate,
    ) -> impl Future<Output = Result<Option<ExerciseTutorial>>> + Send;

    fn delete_exercise(&self, exercise_id: Uuid) -> impl Future<Output = Result<bool>> + Send;
}
