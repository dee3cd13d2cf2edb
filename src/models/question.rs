use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::answer::{AnswerRejection, AnswerValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "YES_NO")]
    YesNo,
    #[serde(rename = "SCALE_0_10")]
    Scale0To10,
    #[serde(rename = "MULTIPLE_CHOICE")]
    MultipleChoice,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::YesNo => "YES_NO",
            QuestionType::Scale0To10 => "SCALE_0_10",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YES_NO" => Ok(QuestionType::YesNo),
            "SCALE_0_10" => Ok(QuestionType::Scale0To10),
            "MULTIPLE_CHOICE" => Ok(QuestionType::MultipleChoice),
            other => Err(format!("unknown question type {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: Uuid,
    pub question_id: Uuid,
    pub label: String,
    pub score_value: Decimal,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub weight: Decimal,
    pub order: i32,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Interprets a raw answer string for this question, failing closed on anything
    /// that is not an exact, in-range encoding.
    pub fn interpret(&self, raw: &str) -> Result<AnswerValue, AnswerRejection> {
        match self.question_type {
            QuestionType::YesNo => match raw {
                "YES" => Ok(AnswerValue::YesNo { yes: true }),
                "NO" => Ok(AnswerValue::YesNo { yes: false }),
                other => Err(AnswerRejection::NotYesNo(other.to_string())),
            },
            QuestionType::Scale0To10 => {
                let value: i64 = raw
                    .parse()
                    .map_err(|_| AnswerRejection::NotAnInteger(raw.to_string()))?;
                if !(0..=10).contains(&value) {
                    return Err(AnswerRejection::OutOfRange(value));
                }
                Ok(AnswerValue::Scale { value: value as u8 })
            }
            QuestionType::MultipleChoice => {
                if self.options.is_empty() {
                    return Err(AnswerRejection::NoOptions);
                }
                // Options are matched on the rendered score value token, never numerically.
                self.options
                    .iter()
                    .find(|option| option.score_value.to_string() == raw)
                    .map(|option| AnswerValue::Choice {
                        option_id: option.id,
                        score_value: option.score_value,
                    })
                    .ok_or_else(|| AnswerRejection::UnknownOption(raw.to_string()))
            }
        }
    }

    pub fn sort_options(&mut self) {
        self.options.sort_by_key(|option| option.order);
    }
}

/// Partial edit of a question's text, weight or display order.
#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub text: Option<String>,
    pub weight: Option<Decimal>,
    pub order: Option<i32>,
}

impl QuestionUpdate {
    pub fn apply(&self, question: &mut Question, now: DateTime<Utc>) {
        if let Some(text) = &self.text {
            question.text = text.clone();
        }
        if let Some(weight) = self.weight {
            question.weight = weight;
        }
        if let Some(order) = self.order {
            question.order = order;
        }
        question.updated_at = now;
    }
}
