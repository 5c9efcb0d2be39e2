use serde::{Deserialize, Serialize};

use crate::core::criteria;
use crate::models::{CriterionWeights, SurveyAnswers};

/// One criterion's contribution to the final percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub name: String,
    pub weight: u32,
    /// Averaged score pieces for this criterion, in [0, 1].
    pub value: f64,
}

/// Full scoring result: the rounded percentage plus the per-criterion
/// values that produced it. Criteria with no usable signal on either side
/// are absent from the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub total: u8,
    pub criteria: Vec<CriterionScore>,
}

/// Compatibility percentage between two users' survey answers.
///
/// Pure and deterministic; identical inputs always produce identical
/// output. Malformed or missing answers degrade to neutral contributions,
/// they never panic. Two records with no usable data at all score 0.
pub fn compatibility_score(
    mine: &SurveyAnswers,
    theirs: &SurveyAnswers,
    weights: &CriterionWeights,
) -> u8 {
    compatibility_breakdown(mine, theirs, weights).total
}

/// Like [`compatibility_score`] but keeps the per-criterion values, used by
/// the pair-score endpoint to explain a percentage.
pub fn compatibility_breakdown(
    mine: &SurveyAnswers,
    theirs: &SurveyAnswers,
    weights: &CriterionWeights,
) -> ScoreBreakdown {
    let mut agg = Aggregator::default();

    // Tolerance criteria are judged from both perspectives: my tolerance
    // against their attribute and vice versa.
    agg.add(
        "smoking",
        weights.smoking,
        &[
            criteria::tolerance_piece(mine.smoking_tolerance, theirs.is_smoker),
            criteria::tolerance_piece(theirs.smoking_tolerance, mine.is_smoker),
        ],
    );
    agg.add(
        "pets",
        weights.pets,
        &[
            criteria::tolerance_piece(mine.pet_tolerance, theirs.has_pet),
            criteria::tolerance_piece(theirs.pet_tolerance, mine.has_pet),
        ],
    );
    agg.add(
        "sabbath",
        weights.sabbath,
        &[
            criteria::tolerance_piece(mine.sabbath_tolerance, theirs.observes_sabbath),
            criteria::tolerance_piece(theirs.sabbath_tolerance, mine.observes_sabbath),
        ],
    );
    agg.add(
        "kosher",
        weights.kosher,
        &[
            criteria::diet_piece(mine.diet_tolerance, theirs.keeps_kosher, theirs.diet_type),
            criteria::diet_piece(theirs.diet_tolerance, mine.keeps_kosher, mine.diet_type),
        ],
    );
    agg.add(
        "partner-age",
        weights.partner_age,
        &[
            criteria::age_stance_piece(mine.partner_age_stance),
            criteria::age_stance_piece(theirs.partner_age_stance),
        ],
    );
    agg.add(
        "noise",
        weights.noise,
        &[
            criteria::noise_piece(mine.home_vibe, theirs.lifestyle),
            criteria::noise_piece(theirs.home_vibe, mine.lifestyle),
        ],
    );
    agg.add(
        "lifestyle",
        weights.lifestyle,
        &[criteria::lifestyle_piece(mine.lifestyle, theirs.lifestyle)],
    );
    agg.add(
        "cleanliness",
        weights.cleanliness,
        &[criteria::scale_piece(
            mine.cleanliness_importance,
            theirs.cleanliness_importance,
        )],
    );
    agg.add(
        "cooking",
        weights.cooking,
        &[criteria::cooking_piece(mine.cooking_style, theirs.cooking_style)],
    );
    agg.add(
        "hosting",
        weights.hosting,
        &[criteria::hosting_piece(
            mine.hosting_preference,
            theirs.hosting_preference,
        )],
    );
    agg.add(
        "age-range",
        weights.age_range,
        &[
            criteria::age_range_piece(mine.preferred_age_min, mine.preferred_age_max, theirs.age),
            criteria::age_range_piece(theirs.preferred_age_min, theirs.preferred_age_max, mine.age),
        ],
    );
    agg.add(
        "hobbies",
        weights.hobbies,
        &[criteria::set_piece(&mine.hobbies, &theirs.hobbies)],
    );
    agg.add(
        "personality",
        weights.personality,
        &[criteria::set_piece(&mine.personality_tags, &theirs.personality_tags)],
    );

    agg.finish()
}

/// Weighted-average accumulator over criterion score pieces.
#[derive(Default)]
struct Aggregator {
    numerator: f64,
    denominator: f64,
    criteria: Vec<CriterionScore>,
}

impl Aggregator {
    /// Average the valid pieces for one criterion and fold them in. A
    /// criterion with no valid piece is skipped entirely: it contributes to
    /// neither numerator nor denominator.
    fn add(&mut self, name: &'static str, weight: u32, pieces: &[Option<f64>]) {
        let valid: Vec<f64> = pieces.iter().copied().flatten().collect();
        if valid.is_empty() {
            return;
        }

        let value = valid.iter().sum::<f64>() / valid.len() as f64;
        self.numerator += value * weight as f64;
        self.denominator += weight as f64;
        self.criteria.push(CriterionScore {
            name: name.to_string(),
            weight,
            value,
        });
    }

    /// Final percentage. Rounds half away from zero (`f64::round`); with no
    /// scorable criteria the result is 0, not 50. An empty survey reads as
    /// "no data", never as an average match.
    fn finish(self) -> ScoreBreakdown {
        let total = if self.denominator > 0.0 {
            (100.0 * self.numerator / self.denominator).round() as u8
        } else {
            0
        };

        ScoreBreakdown {
            total,
            criteria: self.criteria,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DietTolerance, DietType, Tolerance};

    fn weights() -> CriterionWeights {
        CriterionWeights::default()
    }

    #[test]
    fn test_empty_surveys_score_zero() {
        let a = SurveyAnswers::default();
        let b = SurveyAnswers::default();

        let breakdown = compatibility_breakdown(&a, &b, &weights());
        assert_eq!(breakdown.total, 0);
        assert!(breakdown.criteria.is_empty());
    }

    #[test]
    fn test_single_full_criterion_scores_100() {
        // My tolerance accepts smokers; their unstated tolerance accepts my
        // known non-smoking. Both directions land at 1.0.
        let a = SurveyAnswers {
            is_smoker: Some(false),
            smoking_tolerance: Some(Tolerance::NoProblem),
            ..Default::default()
        };
        let b = SurveyAnswers {
            is_smoker: Some(true),
            ..Default::default()
        };

        let breakdown = compatibility_breakdown(&a, &b, &weights());
        assert_eq!(breakdown.total, 100);
        assert_eq!(breakdown.criteria.len(), 1);
        assert_eq!(breakdown.criteria[0].name, "smoking");
        assert_eq!(breakdown.criteria[0].value, 1.0);
    }

    #[test]
    fn test_kosher_only_violation_scores_zero() {
        let a = SurveyAnswers {
            diet_tolerance: Some(DietTolerance::KosherOnly),
            ..Default::default()
        };
        let b = SurveyAnswers {
            keeps_kosher: Some(false),
            diet_type: Some(DietType::Vegan),
            ..Default::default()
        };

        assert_eq!(compatibility_score(&a, &b, &weights()), 0);
    }

    #[test]
    fn test_kosher_partner_beats_non_kosher_partner() {
        let a = SurveyAnswers {
            diet_tolerance: Some(DietTolerance::KosherOnly),
            cleanliness_importance: Some(4),
            ..Default::default()
        };
        let kosher = SurveyAnswers {
            keeps_kosher: Some(true),
            cleanliness_importance: Some(4),
            ..Default::default()
        };
        let not_kosher = SurveyAnswers {
            keeps_kosher: Some(false),
            cleanliness_importance: Some(4),
            ..Default::default()
        };

        let with_kosher = compatibility_score(&a, &kosher, &weights());
        let with_non_kosher = compatibility_score(&a, &not_kosher, &weights());
        assert!(with_kosher > with_non_kosher);
    }

    #[test]
    fn test_cleanliness_only_pair_scores_60() {
        let a = SurveyAnswers {
            cleanliness_importance: Some(5),
            ..Default::default()
        };
        let b = SurveyAnswers {
            cleanliness_importance: Some(3),
            ..Default::default()
        };

        assert_eq!(compatibility_score(&a, &b, &weights()), 60);
    }

    #[test]
    fn test_identical_answers_are_symmetric() {
        let answers = SurveyAnswers {
            is_smoker: Some(false),
            has_pet: Some(true),
            smoking_tolerance: Some(Tolerance::PreferNot),
            pet_tolerance: Some(Tolerance::NoProblem),
            cleanliness_importance: Some(4),
            age: Some(26),
            preferred_age_min: Some(22),
            preferred_age_max: Some(30),
            hobbies: vec!["music".to_string(), "hiking".to_string()],
            ..Default::default()
        };

        let ab = compatibility_score(&answers, &answers.clone(), &weights());
        let ba = compatibility_score(&answers.clone(), &answers, &weights());
        assert_eq!(ab, ba);
        assert!(ab >= 90, "self-consistent answers should score high, got {}", ab);
    }

    #[test]
    fn test_score_bounds_on_adversarial_input() {
        let a = SurveyAnswers {
            diet_tolerance: Some(DietTolerance::KosherOnly),
            cleanliness_importance: Some(200), // out of scale, clamped
            preferred_age_min: Some(30),
            preferred_age_max: Some(20), // inverted range
            age: Some(25),
            ..Default::default()
        };
        let b = SurveyAnswers {
            keeps_kosher: Some(false),
            cleanliness_importance: Some(1),
            age: Some(90),
            ..Default::default()
        };

        let score = compatibility_score(&a, &b, &weights());
        assert!(score <= 100);
    }

    #[test]
    fn test_skipped_criterion_does_not_dilute() {
        // Identical surveys, one with an extra unanswered area: the skipped
        // criterion must not pull the percentage down.
        let a = SurveyAnswers {
            cleanliness_importance: Some(4),
            ..Default::default()
        };
        let b = SurveyAnswers {
            cleanliness_importance: Some(4),
            ..Default::default()
        };

        assert_eq!(compatibility_score(&a, &b, &weights()), 100);
    }

    #[test]
    fn test_partially_answered_direction_still_counts() {
        let a = SurveyAnswers {
            smoking_tolerance: Some(Tolerance::PreferNot),
            cleanliness_importance: Some(5),
            ..Default::default()
        };
        let b = SurveyAnswers {
            is_smoker: Some(true),
            cleanliness_importance: Some(5),
            ..Default::default()
        };

        // smoking: my prefer-not vs their true -> 0.5, the reverse direction
        // has no signal; cleanliness 1.0.
        // total = (0.5*5 + 1.0*3) / 8 = 0.6875 -> 69
        assert_eq!(compatibility_score(&a, &b, &weights()), 69);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // hobbies: 3 shared of 4 distinct -> 0.75; personality: one side
        // empty -> 0.5. Aggregate is exactly 62.5%, which must round to 63.
        let a = SurveyAnswers {
            hobbies: vec!["music".into(), "hiking".into(), "cooking".into()],
            personality_tags: vec!["curious".into()],
            ..Default::default()
        };
        let b = SurveyAnswers {
            hobbies: vec![
                "music".into(),
                "hiking".into(),
                "cooking".into(),
                "films".into(),
            ],
            ..Default::default()
        };

        assert_eq!(compatibility_score(&a, &b, &weights()), 63);
    }
}
