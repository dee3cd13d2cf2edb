use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::exercise::{ExerciseTutorial, ExerciseUpdate, IntensityLevel};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseQuery {
    pub intensity: Option<IntensityLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExercisePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub intensity_level: IntensityLevel,
    pub safety_guidelines: Option<String>,
    #[validate(url)]
    pub video_link: Option<String>,
}

impl CreateExercisePayload {
    pub fn into_exercise(self, now: DateTime<Utc>) -> ExerciseTutorial {
        ExerciseTutorial {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            intensity_level: self.intensity_level,
            safety_guidelines: self.safety_guidelines,
            video_link: self.video_link,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateExercisePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub intensity_level: Option<IntensityLevel>,
    pub safety_guidelines: Option<String>,
    #[validate(url)]
    pub video_link: Option<String>,
}

impl From<UpdateExercisePayload> for ExerciseUpdate {
    fn from(payload: UpdateExercisePayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            intensity_level: payload.intensity_level,
            safety_guidelines: payload.safety_guidelines,
            video_link: payload.video_link,
        }
    }
}
