use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::exercise::{ExerciseTutorial, IntensityLevel};
use crate::models::question::{Question, QuestionOption, QuestionType};
use crate::models::quiz::{Quiz, ScoringRule};

pub const DEFAULT_QUIZ_NAME: &str = "Daily Wellness Check";
const DEFAULT_QUIZ_DESCRIPTION: &str =
    "A quick check to see whether today is a good day to exercise and which activity fits";

struct BaselineQuestion {
    text: &'static str,
    question_type: QuestionType,
    /// Tenths.
    weight: i64,
    options: &'static [(&'static str, i64)],
}

const BASELINE_QUESTIONS: &[BaselineQuestion] = &[
    BaselineQuestion {
        text: "How is your energy level today? (0 = very low, 10 = very high)",
        question_type: QuestionType::Scale0To10,
        weight: 15,
        options: &[],
    },
    BaselineQuestion {
        text: "How is your pain today? (0 = no pain, 10 = severe pain)",
        question_type: QuestionType::Scale0To10,
        weight: 20,
        options: &[],
    },
    BaselineQuestion {
        text: "Are you feeling nauseous today?",
        question_type: QuestionType::YesNo,
        weight: 10,
        options: &[],
    },
    BaselineQuestion {
        text: "How well did you sleep last night?",
        question_type: QuestionType::MultipleChoice,
        weight: 12,
        options: &[("Poor", 2), ("Fair", 5), ("Good", 8), ("Excellent", 10)],
    },
    BaselineQuestion {
        text: "Have you urinated today?",
        question_type: QuestionType::YesNo,
        weight: 10,
        options: &[],
    },
    BaselineQuestion {
        text: "How much fluid have you had today?",
        question_type: QuestionType::MultipleChoice,
        weight: 10,
        options: &[
            ("Less than 500 ml", 2),
            ("Between 500 ml and 1 L", 5),
            ("Between 1 L and 2 L", 8),
            ("More than 2 L", 10),
        ],
    },
    BaselineQuestion {
        text: "How was your last meal?",
        question_type: QuestionType::MultipleChoice,
        weight: 10,
        options: &[
            ("I have not eaten yet", 2),
            ("Light snack", 5),
            ("Full meal", 8),
            ("I had nausea or vomiting", 1),
        ],
    },
    BaselineQuestion {
        text: "Are you feeling dizzy or short of breath?",
        question_type: QuestionType::YesNo,
        weight: 15,
        options: &[],
    },
    BaselineQuestion {
        text: "Have you had a fever or chills in the last 24 hours?",
        question_type: QuestionType::YesNo,
        weight: 20,
        options: &[],
    },
    BaselineQuestion {
        text: "Have you noticed unusual bleeding or bruising?",
        question_type: QuestionType::YesNo,
        weight: 20,
        options: &[],
    },
];

/// (min, max, good day, exercise type, description)
const BASELINE_TIERS: &[(i64, i64, bool, &str, &str)] = &[
    (
        0,
        20,
        false,
        "Rest day",
        "Today is not a good day for exercise. Focus on rest and recovery.",
    ),
    (
        20,
        40,
        true,
        "Active rest",
        "Gentle movement such as a slow walk or stretching is recommended.",
    ),
    (
        40,
        60,
        true,
        "Light exercise",
        "A light walk or gentle stretching for 15 to 20 minutes.",
    ),
    (
        60,
        100,
        true,
        "Moderate exercise",
        "You can do moderate exercise such as a brisk walk or light strength training.",
    ),
];

struct BaselineExercise {
    name: &'static str,
    description: &'static str,
    intensity_level: IntensityLevel,
    safety_guidelines: &'static str,
}

const BASELINE_EXERCISES: &[BaselineExercise] = &[
    BaselineExercise {
        name: "Light walk",
        description: "A comfortable 10 to 20 minute walk, staying within your limits.",
        intensity_level: IntensityLevel::Light,
        safety_guidelines: "Stay hydrated. Stop if you feel dizzy, short of breath or unusual pain.",
    },
    BaselineExercise {
        name: "Gentle stretching",
        description: "Light stretches for mobility and stiffness (5 to 10 minutes).",
        intensity_level: IntensityLevel::Light,
        safety_guidelines: "Do not force it. Hold each position for 20 to 30 seconds.",
    },
    BaselineExercise {
        name: "Light strength (seated)",
        description: "Light band or bodyweight exercises with frequent breaks (8 to 12 minutes).",
        intensity_level: IntensityLevel::Moderate,
        safety_guidelines: "Prioritise technique. Stop if you feel pain or severe shortness of breath.",
    },
    BaselineExercise {
        name: "Controlled moderate cardio",
        description: "Marching in place or walking at a pace where you can still talk (10 to 15 minutes).",
        intensity_level: IntensityLevel::Moderate,
        safety_guidelines: "Keep the effort light to moderate and stop if you notice unusual symptoms.",
    },
    BaselineExercise {
        name: "Functional circuit",
        description: "A short strength and mobility sequence without impact (10 to 15 minutes).",
        intensity_level: IntensityLevel::Strong,
        safety_guidelines: "Avoid impact. Take breaks. Stop if you feel pain, dizziness or shortness of breath.",
    },
];

/// The out-of-the-box quiz: ten questions and a four-tier scoring table, created active.
pub fn default_quiz(now: DateTime<Utc>) -> Quiz {
    let quiz_id = Uuid::new_v4();

    let questions = BASELINE_QUESTIONS
        .iter()
        .zip(1..)
        .map(|(entry, order)| {
            let question_id = Uuid::new_v4();
            Question {
                id: question_id,
                quiz_id,
                text: entry.text.to_string(),
                question_type: entry.question_type,
                weight: Decimal::new(entry.weight, 1),
                order,
                options: entry
                    .options
                    .iter()
                    .zip(1..)
                    .map(|((label, score), option_order)| QuestionOption {
                        id: Uuid::new_v4(),
                        question_id,
                        label: label.to_string(),
                        score_value: Decimal::from(*score),
                        order: option_order,
                    })
                    .collect(),
                created_at: now,
                updated_at: now,
            }
        })
        .collect();

    let scoring_rules = BASELINE_TIERS
        .iter()
        .map(|(min, max, good, exercise, description)| ScoringRule {
            id: Uuid::new_v4(),
            quiz_id,
            min_score: Decimal::from(*min),
            max_score: Decimal::from(*max),
            is_good_day: *good,
            recommended_exercise_type: exercise.to_string(),
            exercise_description: Some(description.to_string()),
        })
        .collect();

    Quiz {
        id: quiz_id,
        name: DEFAULT_QUIZ_NAME.to_string(),
        description: Some(DEFAULT_QUIZ_DESCRIPTION.to_string()),
        is_active: true,
        created_by: None,
        created_at: now,
        updated_at: now,
        questions,
        scoring_rules,
    }
}

pub fn default_exercises(now: DateTime<Utc>) -> Vec<ExerciseTutorial> {
    BASELINE_EXERCISES
        .iter()
        .map(|exercise| ExerciseTutorial {
            id: Uuid::new_v4(),
            name: exercise.name.to_string(),
            description: Some(exercise.description.to_string()),
            intensity_level: exercise.intensity_level,
            safety_guidelines: Some(exercise.safety_guidelines.to_string()),
            video_link: None,
            created_at: now,
            updated_at: now,
        })
        .collect()
}
