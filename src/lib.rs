//! Dira Algo - Roommate matching service for the Dira apartment-sharing app
//!
//! This library provides the compatibility scoring algorithm used by the
//! Dira app: a weighted multi-criteria comparison of two users' survey
//! answers, plus the ranking pipeline and service plumbing around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compatibility_breakdown, compatibility_score, Matcher, ScoreBreakdown};
pub use crate::models::{
    CandidateProfile, CriterionWeights, FindMatchesRequest, FindMatchesResponse, MatchFilters,
    ScoredCandidate, SurveyAnswers,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let score = compatibility_score(
            &SurveyAnswers::default(),
            &SurveyAnswers::default(),
            &CriterionWeights::default(),
        );
        assert_eq!(score, 0);
    }
}
