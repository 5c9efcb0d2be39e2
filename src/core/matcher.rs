use crate::core::{filters::matches_basic_constraints, scoring::compatibility_score};
use crate::models::{CandidateProfile, CriterionWeights, MatchFilters, ScoredCandidate};

/// Result of ranking one user against a candidate pool.
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Ranking orchestrator.
///
/// # Pipeline stages
/// 1. Hard constraint pre-filter (active, gender, city, exclusions)
/// 2. Pairwise compatibility scoring
/// 3. Score floor + ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: CriterionWeights,
    min_score: u8,
}

impl Matcher {
    pub fn new(weights: CriterionWeights, min_score: u8) -> Self {
        Self { weights, min_score }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: CriterionWeights::default(),
            min_score: 5,
        }
    }

    pub fn weights(&self) -> &CriterionWeights {
        &self.weights
    }

    /// Score and rank candidates for a seeker.
    ///
    /// The seeker's own id is always excluded. Results are sorted by
    /// compatibility descending, user id ascending as a deterministic
    /// tiebreak, and truncated to `limit`.
    pub fn find_matches(
        &self,
        seeker: &CandidateProfile,
        filters: &MatchFilters,
        candidates: Vec<CandidateProfile>,
        limit: usize,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|profile| profile.user_id != seeker.user_id)
            .filter(|profile| matches_basic_constraints(profile, filters))
            .filter_map(|profile| {
                let compatibility =
                    compatibility_score(&seeker.answers, &profile.answers, &self.weights);

                if compatibility < self.min_score {
                    return None;
                }

                let shared_hobbies = shared_hobbies(&seeker.answers.hobbies, &profile.answers.hobbies);

                Some(ScoredCandidate {
                    user_id: profile.user_id,
                    name: profile.name,
                    gender: profile.gender,
                    occupation: profile.occupation,
                    city: profile.city,
                    compatibility,
                    shared_hobbies,
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.compatibility
                .cmp(&a.compatibility)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        scored.truncate(limit);

        MatchResult {
            matches: scored,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Hobbies both users listed, in the seeker's order.
fn shared_hobbies(mine: &[String], theirs: &[String]) -> Vec<String> {
    mine.iter()
        .filter(|hobby| theirs.iter().any(|h| h == *hobby))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, SurveyAnswers, Tolerance};

    fn seeker() -> CandidateProfile {
        CandidateProfile {
            user_id: "seeker".to_string(),
            name: "Seeker".to_string(),
            gender: Some(Gender::Female),
            occupation: None,
            city: Some("Tel Aviv".to_string()),
            preferred_genders: vec![Gender::Female],
            is_active: true,
            survey_version: 1,
            answers: SurveyAnswers {
                is_smoker: Some(false),
                smoking_tolerance: Some(Tolerance::PreferNot),
                cleanliness_importance: Some(4),
                hobbies: vec!["music".to_string(), "hiking".to_string()],
                ..Default::default()
            },
        }
    }

    fn candidate(id: &str, smoker: bool, cleanliness: u8) -> CandidateProfile {
        CandidateProfile {
            user_id: id.to_string(),
            name: format!("User {}", id),
            gender: Some(Gender::Female),
            occupation: None,
            city: Some("Tel Aviv".to_string()),
            preferred_genders: vec![],
            is_active: true,
            survey_version: 1,
            answers: SurveyAnswers {
                is_smoker: Some(smoker),
                cleanliness_importance: Some(cleanliness),
                hobbies: vec!["music".to_string()],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_non_smoker_outranks_smoker() {
        let matcher = Matcher::with_default_weights();
        let seeker = seeker();
        let filters = MatchFilters {
            genders: seeker.preferred_genders.clone(),
            ..Default::default()
        };

        let candidates = vec![candidate("smoker", true, 4), candidate("tidy", false, 4)];
        let result = matcher.find_matches(&seeker, &filters, candidates, 10);

        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].user_id, "tidy");
        assert!(result.matches[0].compatibility > result.matches[1].compatibility);
    }

    #[test]
    fn test_seeker_never_matches_itself() {
        let matcher = Matcher::with_default_weights();
        let seeker = seeker();
        let mut own_profile = seeker.clone();
        own_profile.answers = seeker.answers.clone();

        let result =
            matcher.find_matches(&seeker, &MatchFilters::default(), vec![own_profile], 10);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_shared_hobbies_reported() {
        let matcher = Matcher::with_default_weights();
        let seeker = seeker();

        let result = matcher.find_matches(
            &seeker,
            &MatchFilters::default(),
            vec![candidate("1", false, 4)],
            10,
        );

        assert_eq!(result.matches[0].shared_hobbies, vec!["music"]);
    }

    #[test]
    fn test_respects_limit_and_reports_pool_size() {
        let matcher = Matcher::with_default_weights();
        let seeker = seeker();

        let candidates: Vec<CandidateProfile> = (0..20)
            .map(|i| candidate(&format!("{:02}", i), false, 1 + (i % 5) as u8))
            .collect();

        let result = matcher.find_matches(&seeker, &MatchFilters::default(), candidates, 5);

        assert_eq!(result.matches.len(), 5);
        assert_eq!(result.total_candidates, 20);
    }

    #[test]
    fn test_sorted_by_score_with_stable_tiebreak() {
        let matcher = Matcher::with_default_weights();
        let seeker = seeker();

        let candidates = vec![
            candidate("b", false, 4),
            candidate("a", false, 4),
            candidate("c", true, 1),
        ];
        let result = matcher.find_matches(&seeker, &MatchFilters::default(), candidates, 10);

        for pair in result.matches.windows(2) {
            assert!(pair[0].compatibility >= pair[1].compatibility);
        }
        // Equal scores fall back to id order
        assert_eq!(result.matches[0].user_id, "a");
        assert_eq!(result.matches[1].user_id, "b");
    }
}
