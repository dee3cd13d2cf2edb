use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::store::WellnessStore;
use crate::error::{Error, Result};
use crate::models::exercise::{ExerciseTutorial, ExerciseUpdate, IntensityLevel};
use crate::models::question::{Question, QuestionUpdate};
use crate::models::quiz::{Quiz, ScoringRule};
use crate::models::quiz_response::QuizResponse;

type DayKey = (Uuid, Uuid, NaiveDate);

#[derive(Debug, Default)]
struct MemoryState {
    quizzes: HashMap<Uuid, Quiz>,
    responses: HashMap<DayKey, QuizResponse>,
    exercises: Vec<ExerciseTutorial>,
}

impl MemoryState {
    fn quiz_of_question(&mut self, question_id: Uuid) -> Option<&mut Quiz> {
        self.quizzes
            .values_mut()
            .find(|quiz| quiz.questions.iter().any(|q| q.id == question_id))
    }
}

/// In-process store with the same uniqueness and all-or-nothing guarantees as [`PgStore`].
///
/// Each operation runs under one lock and mutates only after every check has passed.
///
/// [`PgStore`]: crate::database::PgStore
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the backing store going away; every call fails with `Error::Storage`
    /// until it is switched back on.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn response_count(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.responses.len())
            .unwrap_or_default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(Error::Storage("memory store is unavailable".to_string()));
        }
        self.state
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }
}

impl WellnessStore for MemoryStore {
    async fn active_quiz(&self) -> Result<Option<Quiz>> {
        let state = self.state()?;
        Ok(state.quizzes.values().find(|quiz| quiz.is_active).cloned())
    }

    async fn quiz_by_id(&self, quiz_id: Uuid) -> Result<Option<Quiz>> {
        let state = self.state()?;
        Ok(state.quizzes.get(&quiz_id).cloned())
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let state = self.state()?;
        let mut quizzes: Vec<Quiz> = state.quizzes.values().cloned().collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quizzes)
    }

    async fn insert_quiz(&self, quiz: &Quiz) -> Result<()> {
        let mut state = self.state()?;
        if state.quizzes.contains_key(&quiz.id) {
            return Err(Error::Conflict(format!("quiz {} already exists", quiz.id)));
        }
        if quiz.is_active {
            let now = Utc::now();
            for other in state.quizzes.values_mut().filter(|q| q.is_active) {
                other.is_active = false;
                other.updated_at = now;
            }
        }
        let mut quiz = quiz.clone();
        quiz.normalize();
        state.quizzes.insert(quiz.id, quiz);
        Ok(())
    }

    async fn bootstrap_quiz(&self, quiz: &Quiz) -> Result<bool> {
        let mut state = self.state()?;
        if state.quizzes.values().any(|existing| existing.is_active) {
            return Ok(false);
        }
        let mut quiz = quiz.clone();
        quiz.is_active = true;
        quiz.normalize();
        state.quizzes.insert(quiz.id, quiz);
        Ok(true)
    }

    async fn activate_quiz(&self, quiz_id: Uuid) -> Result<bool> {
        let mut state = self.state()?;
        if !state.quizzes.contains_key(&quiz_id) {
            return Ok(false);
        }
        let now = Utc::now();
        for quiz in state.quizzes.values_mut() {
            let active = quiz.id == quiz_id;
            if quiz.is_active != active {
                quiz.is_active = active;
                quiz.updated_at = now;
            }
        }
        Ok(true)
    }

    async fn insert_question(&self, question: &Question) -> Result<()> {
        let mut state = self.state()?;
        let quiz = state
            .quizzes
            .get_mut(&question.quiz_id)
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", question.quiz_id)))?;
        if quiz.questions.iter().any(|q| q.id == question.id) {
            return Err(Error::Conflict(format!("question {} already exists", question.id)));
        }
        quiz.questions.push(question.clone());
        quiz.updated_at = Utc::now();
        quiz.normalize();
        Ok(())
    }

    async fn update_question(
        &self,
        question_id: Uuid,
        update: &QuestionUpdate,
    ) -> Result<Option<Question>> {
        let mut state = self.state()?;
        let Some(quiz) = state.quiz_of_question(question_id) else {
            return Ok(None);
        };
        let now = Utc::now();
        let mut updated = None;
        if let Some(question) = quiz.questions.iter_mut().find(|q| q.id == question_id) {
            update.apply(question, now);
            updated = Some(question.clone());
        }
        quiz.normalize();
        Ok(updated)
    }

    async fn delete_question(&self, question_id: Uuid) -> Result<bool> {
        let mut state = self.state()?;
        let Some(quiz) = state.quiz_of_question(question_id) else {
            return Ok(false);
        };
        quiz.questions.retain(|q| q.id != question_id);
        quiz.updated_at = Utc::now();
        Ok(true)
    }

    async fn replace_scoring_rules(&self, quiz_id: Uuid, rules: &[ScoringRule]) -> Result<()> {
        let mut state = self.state()?;
        let quiz = state
            .quizzes
            .get_mut(&quiz_id)
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))?;
        quiz.scoring_rules = rules.to_vec();
        quiz.updated_at = Utc::now();
        quiz.normalize();
        Ok(())
    }

    async fn response_for_day(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<QuizResponse>> {
        let state = self.state()?;
        Ok(state.responses.get(&(user_id, quiz_id, date)).cloned())
    }

    async fn insert_response(&self, response: &QuizResponse) -> Result<()> {
        let mut state = self.state()?;
        let key = (response.user_id, response.quiz_id, response.response_date);
        if state.responses.contains_key(&key) {
            return Err(Error::Conflict(format!(
                "response already recorded for {} on {}",
                response.user_id, response.response_date
            )));
        }
        state.responses.insert(key, response.clone());
        Ok(())
    }

    async fn responses_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<QuizResponse>> {
        let state = self.state()?;
        let mut responses: Vec<QuizResponse> = state
            .responses
            .values()
            .filter(|response| response.user_id == user_id)
            .cloned()
            .collect();
        responses.sort_by(|a, b| {
            b.response_date
                .cmp(&a.response_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        responses.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(responses)
    }

    async fn list_exercises(
        &self,
        intensity: Option<IntensityLevel>,
    ) -> Result<Vec<ExerciseTutorial>> {
        let state = self.state()?;
        Ok(state
            .exercises
            .iter()
            .filter(|exercise| intensity.map_or(true, |level| exercise.intensity_level == level))
            .cloned()
            .collect())
    }

    async fn count_exercises(&self) -> Result<i64> {
        let state = self.state()?;
        Ok(state.exercises.len() as i64)
    }

    async fn insert_exercises(&self, exercises: &[ExerciseTutorial]) -> Result<()> {
        let mut state = self.state()?;
        if let Some(dup) = exercises
            .iter()
            .find(|new| state.exercises.iter().any(|existing| existing.id == new.id))
        {
            return Err(Error::Conflict(format!("exercise {} already exists", dup.id)));
        }
        state.exercises.extend_from_slice(exercises);
        Ok(())
    }

    async fn update_exercise(
        &self,
        exercise_id: Uuid,
        update: &ExerciseUpdate,
    ) -> Result<Option<ExerciseTutorial>> {
        let mut state = self.state()?;
        Ok(state
            .exercises
            .iter_mut()
            .find(|exercise| exercise.id == exercise_id)
            .map(|exercise| {
                update.apply(exercise, Utc::now());
                exercise.clone()
            }))
    }

    async fn delete_exercise(&self, exercise_id: Uuid) -> Result<bool> {
        let mut state = self.state()?;
        let before = state.exercises.len();
        state.exercises.retain(|exercise| exercise.id != exercise_id);
        Ok(state.exercises.len() != before)
    }
}
