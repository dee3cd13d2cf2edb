use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::question::{Question, QuestionOption, QuestionType, QuestionUpdate};
use crate::models::quiz::{Quiz, ScoringRule};
use crate::utils::validation::{question_amount, rule_bound};

/// Patient-facing shape of the active quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub weight: Decimal,
    pub order: i32,
    pub options: Vec<OptionView>,
}

/// `score_value` is the exact token a client must send back as `answer_value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionView {
    pub id: Uuid,
    pub label: String,
    pub score_value: String,
    pub order: i32,
}

impl From<&Quiz> for QuizView {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            name: quiz.name.clone(),
            description: quiz.description.clone(),
            questions: quiz.questions.iter().map(QuestionView::from).collect(),
        }
    }
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            question_type: question.question_type,
            weight: question.weight,
            order: question.order,
            options: question.options.iter().map(OptionView::from).collect(),
        }
    }
}

impl From<&QuestionOption> for OptionView {
    fn from(option: &QuestionOption) -> Self {
        Self {
            id: option.id,
            label: option.label.clone(),
            score_value: option.score_value.to_string(),
            order: option.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuizPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<CreateQuestionPayload>,
    #[serde(default)]
    #[validate(nested)]
    pub scoring_rules: Vec<ScoringRulePayload>,
}

impl CreateQuizPayload {
    pub fn into_quiz(self, created_by: Uuid, now: DateTime<Utc>) -> Quiz {
        let quiz_id = Uuid::new_v4();
        let questions = self
            .questions
            .into_iter()
            .zip(1..)
            .map(|(question, position)| question.into_question(quiz_id, position, now))
            .collect();
        let scoring_rules = self
            .scoring_rules
            .into_iter()
            .map(|rule| rule.into_rule(quiz_id))
            .collect();
        let mut quiz = Quiz {
            id: quiz_id,
            name: self.name,
            description: self.description,
            is_active: self.is_active,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
            questions,
            scoring_rules,
        };
        quiz.normalize();
        quiz
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "options_match_type"))]
pub struct CreateQuestionPayload {
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(custom(function = "question_amount"))]
    pub weight: Decimal,
    /// Appended after the existing questions when absent.
    pub order: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<OptionPayload>,
}

fn options_match_type(payload: &CreateQuestionPayload) -> Result<(), ValidationError> {
    match payload.question_type {
        QuestionType::MultipleChoice if payload.options.is_empty() => {
            let mut err = ValidationError::new("options_required");
            err.message = Some("multiple choice questions need at least one option".into());
            Err(err)
        }
        QuestionType::YesNo | QuestionType::Scale0To10 if !payload.options.is_empty() => {
            let mut err = ValidationError::new("options_not_allowed");
            err.message = Some("only multiple choice questions take options".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

impl CreateQuestionPayload {
    pub fn into_question(self, quiz_id: Uuid, default_order: i32, now: DateTime<Utc>) -> Question {
        let question_id = Uuid::new_v4();
        let mut question = Question {
            id: question_id,
            quiz_id,
            text: self.text,
            question_type: self.question_type,
            weight: self.weight,
            order: self.order.unwrap_or(default_order),
            options: self
                .options
                .into_iter()
                .zip(1..)
                .map(|(option, position)| QuestionOption {
                    id: Uuid::new_v4(),
                    question_id,
                    label: option.label,
                    score_value: option.score_value.normalize(),
                    order: option.order.unwrap_or(position),
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };
        question.sort_options();
        question
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptionPayload {
    #[validate(length(min = 1))]
    pub label: String,
    #[validate(custom(function = "question_amount"))]
    pub score_value: Decimal,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(custom(function = "question_amount"))]
    pub weight: Option<Decimal>,
    pub order: Option<i32>,
}

impl From<UpdateQuestionPayload> for QuestionUpdate {
    fn from(payload: UpdateQuestionPayload) -> Self {
        Self {
            text: payload.text,
            weight: payload.weight,
            order: payload.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "ordered_bounds"))]
pub struct ScoringRulePayload {
    #[validate(custom(function = "rule_bound"))]
    pub min_score: Decimal,
    #[validate(custom(function = "rule_bound"))]
    pub max_score: Decimal,
    pub is_good_day: bool,
    #[validate(length(min = 1))]
    pub recommended_exercise_type: String,
    pub exercise_description: Option<String>,
}

fn ordered_bounds(payload: &ScoringRulePayload) -> Result<(), ValidationError> {
    if payload.min_score > payload.max_score {
        let mut err = ValidationError::new("min_above_max");
        err.message = Some("min_score must not exceed max_score".into());
        return Err(err);
    }
    Ok(())
}

impl ScoringRulePayload {
    pub fn into_rule(self, quiz_id: Uuid) -> ScoringRule {
        ScoringRule {
            id: Uuid::new_v4(),
            quiz_id,
            min_score: self.min_score,
            max_score: self.max_score,
            is_good_day: self.is_good_day,
            recommended_exercise_type: self.recommended_exercise_type,
            exercise_description: self.exercise_description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceScoringRulesPayload {
    #[validate(nested)]
    pub rules: Vec<ScoringRulePayload>,
}
