use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::answer::{AnswerSetError, RawAnswer, RejectedAnswer, ValidatedAnswer};
use crate::models::quiz::Quiz;

pub struct ScoringService;

impl ScoringService {
    /// Checks that `answers` cover the quiz's question set exactly once each and that every
    /// value is valid for its question type. All problems are collected before returning.
    pub fn validate_answer_set(
        quiz: &Quiz,
        answers: &[RawAnswer],
    ) -> std::result::Result<Vec<ValidatedAnswer>, AnswerSetError> {
        let mut error = AnswerSetError::default();
        let mut seen: HashSet<Uuid> = HashSet::with_capacity(answers.len());
        let mut validated = Vec::with_capacity(answers.len());

        for answer in answers {
            let Some(question) = quiz.question(answer.question_id) else {
                push_unique(&mut error.unexpected, answer.question_id);
                continue;
            };
            if !seen.insert(answer.question_id) {
                push_unique(&mut error.duplicated, answer.question_id);
                continue;
            }
            match question.interpret(&answer.answer_value) {
                Ok(value) => validated.push(ValidatedAnswer {
                    question_id: answer.question_id,
                    value,
                    raw: answer.answer_value.clone(),
                }),
                Err(reason) => error.invalid.push(RejectedAnswer {
                    question_id: answer.question_id,
                    reason,
                }),
            }
        }

        error.missing = quiz
            .questions
            .iter()
            .filter(|q| !seen.contains(&q.id))
            .map(|q| q.id)
            .collect();

        if error.is_empty() {
            Ok(validated)
        } else {
            Err(error)
        }
    }

    /// Weighted sum of raw points. Not normalised by total weight. Fails instead of
    /// panicking when a weight pushes the sum past `Decimal`'s range.
    pub fn score(quiz: &Quiz, answers: &[ValidatedAnswer]) -> Result<Decimal> {
        answers.iter().try_fold(Decimal::ZERO, |total, answer| {
            let Some(question) = quiz.question(answer.question_id) else {
                return Ok(total);
            };
            answer
                .value
                .points()
                .checked_mul(question.weight)
                .and_then(|points| total.checked_add(points))
                .ok_or_else(|| {
                    tracing::error!(
                        quiz_id = %quiz.id,
                        question_id = %question.id,
                        weight = %question.weight,
                        "score overflowed"
                    );
                    Error::Internal(format!("score overflow on question {}", question.id))
                })
        })
    }
}

fn push_unique(ids: &mut Vec<Uuid>, id: Uuid) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}
