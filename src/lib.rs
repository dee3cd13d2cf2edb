pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::store::WellnessStore;
use crate::services::{
    exercise_service::ExerciseService, quiz_service::QuizService,
    submission_service::SubmissionService,
};
use crate::utils::time::Clock;

pub struct AppState<S> {
    pub quiz_service: QuizService<S>,
    pub submission_service: SubmissionService<S>,
    pub exercise_service: ExerciseService<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            quiz_service: self.quiz_service.clone(),
            submission_service: self.submission_service.clone(),
            exercise_service: self.exercise_service.clone(),
        }
    }
}

impl<S: WellnessStore> AppState<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, bootstrap_default_quiz: bool) -> Self {
        let quiz_service =
            QuizService::new(Arc::clone(&store), Arc::clone(&clock), bootstrap_default_quiz);
        let submission_service = SubmissionService::new(Arc::clone(&store), Arc::clone(&clock));
        let exercise_service = ExerciseService::new(store, clock);

        Self {
            quiz_service,
            submission_service,
            exercise_service,
        }
    }
}
