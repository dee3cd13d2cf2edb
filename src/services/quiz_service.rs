use std::sync::{Arc, RwLock};

use uuid::Uuid;
use validator::Validate;

use crate::database::store::WellnessStore;
use crate::dto::quiz_dto::{
    CreateQuestionPayload, CreateQuizPayload, ReplaceScoringRulesPayload, UpdateQuestionPayload,
};
use crate::error::{Error, Result};
use crate::models::question::{Question, QuestionUpdate};
use crate::models::quiz::{Quiz, ScoringRule};
use crate::models::user::Caller;
use crate::services::baseline;
use crate::utils::time::Clock;

#[derive(Debug, Default)]
struct Snapshot {
    generation: u64,
    quiz: Option<Arc<Quiz>>,
}

/// Owns the quiz configuration: the cached active-quiz snapshot, the baseline bootstrap and
/// the clinician edits. Every edit drops the cached snapshot.
pub struct QuizService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    snapshot: Arc<RwLock<Snapshot>>,
    bootstrap: bool,
}

impl<S> Clone for QuizService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            snapshot: Arc::clone(&self.snapshot),
            bootstrap: self.bootstrap,
        }
    }
}

impl<S: WellnessStore> QuizService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, bootstrap: bool) -> Self {
        Self {
            store,
            clock,
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            bootstrap,
        }
    }

    /// The active quiz with ordered questions, options and rules. Creates the baseline quiz
    /// when nothing is active and bootstrapping is enabled.
    pub async fn active_quiz(&self) -> Result<Option<Arc<Quiz>>> {
        let generation = match self.snapshot.read() {
            Ok(snapshot) => match &snapshot.quiz {
                Some(quiz) => return Ok(Some(Arc::clone(quiz))),
                None => snapshot.generation,
            },
            Err(_) => 0,
        };

        let quiz = match self.store.active_quiz().await? {
            Some(quiz) => quiz,
            None if self.bootstrap => self.ensure_default_quiz().await?,
            None => return Ok(None),
        };

        let quiz = Arc::new(quiz);
        if let Ok(mut snapshot) = self.snapshot.write() {
            // An edit landed while loading; leave the slot empty for the next reader.
            if snapshot.generation == generation {
                snapshot.quiz = Some(Arc::clone(&quiz));
            }
        }
        Ok(Some(quiz))
    }

    /// Creates the baseline quiz unless some quiz is already active. Safe to call repeatedly
    /// and from concurrent callers.
    pub async fn ensure_default_quiz(&self) -> Result<Quiz> {
        if let Some(active) = self.store.active_quiz().await? {
            return Ok(active);
        }

        let quiz = baseline::default_quiz(self.clock.now());
        if self.store.bootstrap_quiz(&quiz).await? {
            tracing::info!(quiz_id = %quiz.id, "created default wellness quiz");
            self.invalidate();
            return Ok(quiz);
        }

        self.store
            .active_quiz()
            .await?
            .ok_or_else(|| Error::Internal("active quiz vanished during bootstrap".to_string()))
    }

    pub fn invalidate(&self) {
        if let Ok(mut snapshot) = self.snapshot.write() {
            snapshot.generation += 1;
            snapshot.quiz = None;
        }
    }

    pub async fn list_quizzes(&self, caller: &Caller) -> Result<Vec<Quiz>> {
        caller.require_oncologist()?;
        self.store.list_quizzes().await
    }

    pub async fn get_quiz(&self, caller: &Caller, quiz_id: Uuid) -> Result<Quiz> {
        caller.require_oncologist()?;
        self.store
            .quiz_by_id(quiz_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))
    }

    pub async fn create_quiz(&self, caller: &Caller, payload: CreateQuizPayload) -> Result<Quiz> {
        caller.require_oncologist()?;
        payload.validate()?;

        let quiz = payload.into_quiz(caller.user_id, self.clock.now());
        self.store.insert_quiz(&quiz).await?;
        self.invalidate();

        tracing::info!(
            quiz_id = %quiz.id,
            questions = quiz.questions.len(),
            active = quiz.is_active,
            "quiz created"
        );
        Ok(quiz)
    }

    /// Makes `quiz_id` the only active quiz.
    pub async fn activate_quiz(&self, caller: &Caller, quiz_id: Uuid) -> Result<Quiz> {
        caller.require_oncologist()?;
        if !self.store.activate_quiz(quiz_id).await? {
            return Err(Error::NotFound(format!("Quiz {} not found", quiz_id)));
        }
        self.invalidate();
        tracing::info!(%quiz_id, "quiz activated");

        self.store
            .quiz_by_id(quiz_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))
    }

    pub async fn add_question(
        &self,
        caller: &Caller,
        quiz_id: Uuid,
        payload: CreateQuestionPayload,
    ) -> Result<Question> {
        caller.require_oncologist()?;
        payload.validate()?;

        let quiz = self
            .store
            .quiz_by_id(quiz_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))?;
        let next_order = quiz.questions.iter().map(|q| q.order).max().unwrap_or(0) + 1;

        let question = payload.into_question(quiz_id, next_order, self.clock.now());
        self.store.insert_question(&question).await?;
        self.invalidate();
        Ok(question)
    }

    pub async fn update_question(
        &self,
        caller: &Caller,
        question_id: Uuid,
        payload: UpdateQuestionPayload,
    ) -> Result<Question> {
        caller.require_oncologist()?;
        payload.validate()?;

        let update = QuestionUpdate::from(payload);
        let question = self
            .store
            .update_question(question_id, &update)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Question {} not found", question_id)))?;
        self.invalidate();
        Ok(question)
    }

    pub async fn delete_question(&self, caller: &Caller, question_id: Uuid) -> Result<()> {
        caller.require_oncologist()?;
        if !self.store.delete_question(question_id).await? {
            return Err(Error::NotFound(format!("Question {} not found", question_id)));
        }
        self.invalidate();
        Ok(())
    }

    /// Swaps the whole scoring table in one write.
    pub async fn replace_scoring_rules(
        &self,
        caller: &Caller,
        quiz_id: Uuid,
        payload: ReplaceScoringRulesPayload,
    ) -> Result<Vec<ScoringRule>> {
        caller.require_oncologist()?;
        payload.validate()?;

        let mut rules: Vec<ScoringRule> = payload
            .rules
            .into_iter()
            .map(|rule| rule.into_rule(quiz_id))
            .collect();
        rules.sort_by(|a, b| a.min_score.cmp(&b.min_score));
        if rules.windows(2).any(|pair| pair[0].max_score < pair[1].min_score) {
            tracing::warn!(%quiz_id, "scoring table leaves gaps, fallback will apply inside them");
        }

        self.store.replace_scoring_rules(quiz_id, &rules).await?;
        self.invalidate();
        Ok(rules)
    }
}
