use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question::Question;

/// Score range mapped to a recommendation. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub min_score: Decimal,
    pub max_score: Decimal,
    pub is_good_day: bool,
    pub recommended_exercise_type: String,
    pub exercise_description: Option<String>,
}

impl ScoringRule {
    pub fn contains(&self, score: Decimal) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// A quiz aggregate: the quiz row with its questions, their options and its scoring table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub scoring_rules: Vec<ScoringRule>,
}

impl Quiz {
    pub fn question(&self, question_id: Uuid) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Puts questions and options in display order and the scoring table in ascending
    /// `min_score` order.
    pub fn normalize(&mut self) {
        self.questions.sort_by_key(|q| q.order);
        for question in &mut self.questions {
            question.sort_options();
        }
        self.scoring_rules.sort_by(|a, b| a.min_score.cmp(&b.min_score));
    }
}
