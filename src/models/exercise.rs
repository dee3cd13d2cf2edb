use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntensityLevel {
    Light,
    Moderate,
    Strong,
}

impl IntensityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityLevel::Light => "LIGHT",
            IntensityLevel::Moderate => "MODERATE",
            IntensityLevel::Strong => "STRONG",
        }
    }
}

impl fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntensityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIGHT" => Ok(IntensityLevel::Light),
            "MODERATE" => Ok(IntensityLevel::Moderate),
            "STRONG" => Ok(IntensityLevel::Strong),
            other => Err(format!("unknown intensity level {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTutorial {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub intensity_level: IntensityLevel,
    pub safety_guidelines: Option<String>,
    pub video_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub intensity_level: Option<IntensityLevel>,
    pub safety_guidelines: Option<String>,
    pub video_link: Option<String>,
}

impl ExerciseUpdate {
    pub fn apply(&self, exercise: &mut ExerciseTutorial, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            exercise.name = name.clone();
        }
        if let Some(description) = &self.description {
            exercise.description = Some(description.clone());
        }
        if let Some(level) = self.intensity_level {
            exercise.intensity_level = level;
        }
        if let Some(guidelines) = &self.safety_guidelines {
            exercise.safety_guidelines = Some(guidelines.clone());
        }
        if let Some(link) = &self.video_link {
            exercise.video_link = Some(link.clone());
        }
        exercise.updated_at = now;
    }
}
