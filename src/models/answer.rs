use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Answer exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub question_id: Uuid,
    pub answer_value: String,
}

/// Typed interpretation of a raw answer, produced by `Question::interpret`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerValue {
    YesNo { yes: bool },
    Scale { value: u8 },
    Choice { option_id: Uuid, score_value: Decimal },
}

impl AnswerValue {
    /// Raw point value before the question weight is applied.
    pub fn points(&self) -> Decimal {
        match self {
            AnswerValue::YesNo { yes: true } => Decimal::from(10),
            AnswerValue::YesNo { yes: false } => Decimal::ZERO,
            AnswerValue::Scale { value } => Decimal::from(*value),
            AnswerValue::Choice { score_value, .. } => *score_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnswer {
    pub question_id: Uuid,
    pub value: AnswerValue,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerRejection {
    #[error("expected YES or NO, got {0:?}")]
    NotYesNo(String),
    #[error("expected an integer between 0 and 10, got {0:?}")]
    NotAnInteger(String),
    #[error("{0} is outside the 0-10 scale")]
    OutOfRange(i64),
    #[error("{0:?} does not match any option")]
    UnknownOption(String),
    #[error("question has no options configured")]
    NoOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedAnswer {
    pub question_id: Uuid,
    pub reason: AnswerRejection,
}

/// Every problem found in a submitted answer set, so the caller can fix them in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSetError {
    pub missing: Vec<Uuid>,
    pub unexpected: Vec<Uuid>,
    pub duplicated: Vec<Uuid>,
    pub invalid: Vec<RejectedAnswer>,
}

impl AnswerSetError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
            && self.unexpected.is_empty()
            && self.duplicated.is_empty()
            && self.invalid.is_empty()
    }
}

impl fmt::Display for AnswerSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing answers for questions {}", join_ids(&self.missing)));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unknown questions {}", join_ids(&self.unexpected)));
        }
        if !self.duplicated.is_empty() {
            parts.push(format!("questions answered more than once {}", join_ids(&self.duplicated)));
        }
        for rejected in &self.invalid {
            parts.push(format!("question {}: {}", rejected.question_id, rejected.reason));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for AnswerSetError {}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}
