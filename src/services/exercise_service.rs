use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::database::store::WellnessStore;
use crate::dto::exercise_dto::{CreateExercisePayload, UpdateExercisePayload};
use crate::error::{Error, Result};
use crate::models::exercise::{ExerciseTutorial, ExerciseUpdate, IntensityLevel};
use crate::models::user::Caller;
use crate::services::baseline;
use crate::utils::time::Clock;

pub struct ExerciseService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for ExerciseService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: WellnessStore> ExerciseService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn list(&self, intensity: Option<IntensityLevel>) -> Result<Vec<ExerciseTutorial>> {
        self.store.list_exercises(intensity).await
    }

    /// Seeds the baseline tutorials when the catalog is empty. Returns how many were added.
    pub async fn ensure_baseline(&self) -> Result<usize> {
        if self.store.count_exercises().await? > 0 {
            return Ok(0);
        }
        let exercises = baseline::default_exercises(self.clock.now());
        self.store.insert_exercises(&exercises).await?;
        tracing::info!(count = exercises.len(), "seeded baseline exercise tutorials");
        Ok(exercises.len())
    }

    pub async fn create(
        &self,
        caller: &Caller,
        payload: CreateExercisePayload,
    ) -> Result<ExerciseTutorial> {
        caller.require_oncologist()?;
        payload.validate()?;

        let exercise = payload.into_exercise(self.clock.now());
        self.store
            .insert_exercises(std::slice::from_ref(&exercise))
            .await?;
        Ok(exercise)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        exercise_id: Uuid,
        payload: UpdateExercisePayload,
    ) -> Result<ExerciseTutorial> {
        caller.require_oncologist()?;
        payload.validate()?;

        self.store
            .update_exercise(exercise_id, &ExerciseUpdate::from(payload))
            .await?
            .ok_or_else(|| Error::NotFound(format!("Exercise {} not found", exercise_id)))
    }

    pub async fn delete(&self, caller: &Caller, exercise_id: Uuid) -> Result<()> {
        caller.require_oncologist()?;
        if !self.store.delete_exercise(exercise_id).await? {
            return Err(Error::NotFound(format!("Exercise {} not found", exercise_id)));
        }
        Ok(())
    }
}
