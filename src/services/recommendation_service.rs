use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::quiz::ScoringRule;

/// Scores at or above this are a good day when no rule matches.
const FALLBACK_GOOD_DAY_THRESHOLD: i64 = 50;
const FALLBACK_GOOD_DAY_EXERCISE: &str = "Light Walk";
const FALLBACK_REST_EXERCISE: &str = "Rest Day";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub is_good_day: bool,
    pub exercise_type: String,
    pub description: Option<String>,
}

impl From<&ScoringRule> for Recommendation {
    fn from(rule: &ScoringRule) -> Self {
        Self {
            is_good_day: rule.is_good_day,
            exercise_type: rule.recommended_exercise_type.clone(),
            description: rule.exercise_description.clone(),
        }
    }
}

pub struct RecommendationService;

impl RecommendationService {
    /// Picks the first rule, in ascending `min_score` order, whose inclusive range contains
    /// `score`. Falls back to [`RecommendationService::fallback`] when none does.
    pub fn resolve(score: Decimal, rules: &[ScoringRule]) -> Recommendation {
        if rules.is_empty() {
            tracing::warn!(%score, "no scoring rules configured, using fallback recommendation");
            return Self::fallback(score);
        }

        let mut ordered: Vec<&ScoringRule> = rules.iter().collect();
        ordered.sort_by(|a, b| a.min_score.cmp(&b.min_score));

        match ordered.into_iter().find(|rule| rule.contains(score)) {
            Some(rule) => Recommendation::from(rule),
            None => {
                tracing::warn!(
                    %score,
                    rules = rules.len(),
                    "score not covered by any scoring rule, using fallback recommendation"
                );
                Self::fallback(score)
            }
        }
    }

    pub fn fallback(score: Decimal) -> Recommendation {
        let is_good_day = score >= Decimal::from(FALLBACK_GOOD_DAY_THRESHOLD);
        let exercise_type = if is_good_day {
            FALLBACK_GOOD_DAY_EXERCISE
        } else {
            FALLBACK_REST_EXERCISE
        };
        Recommendation {
            is_good_day,
            exercise_type: exercise_type.to_string(),
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn rule(min: i64, max: i64, good: bool, label: &str) -> ScoringRule {
        ScoringRule {
            id: Uuid::new_v4(),
            quiz_id: Uuid::nil(),
            min_score: Decimal::from(min),
            max_score: Decimal::from(max),
            is_good_day: good,
            recommended_exercise_type: label.to_string(),
            exercise_description: Some(format!("{label} description")),
        }
    }

    #[test]
    fn shared_boundary_goes_to_lower_rule() {
        let rules = vec![rule(0, 20, false, "Rest"), rule(20, 40, true, "Active Rest")];

        let rec = RecommendationService::resolve(Decimal::from(20), &rules);

        assert!(!rec.is_good_day);
        assert_eq!(rec.exercise_type, "Rest");
    }

    #[test]
    fn bounds_are_inclusive() {
        let rules = vec![rule(10, 20, true, "Walk")];

        assert_eq!(
            RecommendationService::resolve(Decimal::from(10), &rules).exercise_type,
            "Walk"
        );
        assert_eq!(
            RecommendationService::resolve(Decimal::from(20), &rules).exercise_type,
            "Walk"
        );
    }

    #[test]
    fn unsorted_rules_are_scanned_by_min_score() {
        let rules = vec![rule(20, 40, true, "Active Rest"), rule(0, 20, false, "Rest")];

        let rec = RecommendationService::resolve(Decimal::from(20), &rules);

        assert_eq!(rec.exercise_type, "Rest");
    }

    #[test]
    fn empty_table_uses_fallback() {
        let rec = RecommendationService::resolve(Decimal::from(55), &[]);

        assert_eq!(
            rec,
            Recommendation {
                is_good_day: true,
                exercise_type: "Light Walk".into(),
                description: None,
            }
        );
    }

    #[test]
    fn fallback_below_threshold_is_rest_day() {
        let rec = RecommendationService::resolve(Decimal::new(499, 1), &[]);

        assert!(!rec.is_good_day);
        assert_eq!(rec.exercise_type, "Rest Day");
        assert_eq!(
            RecommendationService::fallback(Decimal::from(50)).exercise_type,
            "Light Walk"
        );
    }

    #[test]
    fn gap_and_overflow_use_fallback() {
        let rules = vec![rule(0, 20, false, "Rest"), rule(30, 40, true, "Active Rest")];

        let gap = RecommendationService::resolve(Decimal::new(255, 1), &rules);
        assert_eq!(gap.exercise_type, "Rest Day");
        assert_eq!(gap.description, None);

        let above = RecommendationService::resolve(Decimal::from(120), &rules);
        assert!(above.is_good_day);
        assert_eq!(above.exercise_type, "Light Walk");
    }

    #[test]
    fn matched_rule_carries_description() {
        let rules = vec![rule(0, 100, true, "Moderate")];

        let rec = RecommendationService::resolve(Decimal::from(70), &rules);

        assert_eq!(rec.description.as_deref(), Some("Moderate description"));
    }
}
