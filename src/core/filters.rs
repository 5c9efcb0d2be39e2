use crate::models::{CandidateProfile, MatchFilters};

/// Check a candidate against the hard constraints that apply before any
/// scoring happens.
///
/// Gender and city are the only attributes users can hard-filter on; every
/// survey answer is soft and handled by the scorer.
#[inline]
pub fn matches_basic_constraints(profile: &CandidateProfile, filters: &MatchFilters) -> bool {
    if !profile.is_active {
        return false;
    }

    if filters.exclude_user_ids.contains(&profile.user_id) {
        return false;
    }

    if !filters.genders.is_empty() {
        match profile.gender {
            Some(gender) if filters.genders.contains(&gender) => {}
            _ => return false,
        }
    }

    if let Some(city) = &filters.city {
        match &profile.city {
            Some(candidate_city) if candidate_city.eq_ignore_ascii_case(city) => {}
            _ => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, SurveyAnswers};

    fn candidate(id: &str, gender: Option<Gender>, city: Option<&str>) -> CandidateProfile {
        CandidateProfile {
            user_id: id.to_string(),
            name: format!("User {}", id),
            gender,
            occupation: None,
            city: city.map(str::to_string),
            preferred_genders: vec![],
            is_active: true,
            survey_version: 1,
            answers: SurveyAnswers::default(),
        }
    }

    #[test]
    fn test_active_candidate_with_no_filters_passes() {
        let profile = candidate("1", Some(Gender::Female), Some("Tel Aviv"));
        assert!(matches_basic_constraints(&profile, &MatchFilters::default()));
    }

    #[test]
    fn test_inactive_candidate_filtered() {
        let mut profile = candidate("1", Some(Gender::Female), None);
        profile.is_active = false;
        assert!(!matches_basic_constraints(&profile, &MatchFilters::default()));
    }

    #[test]
    fn test_excluded_id_filtered() {
        let profile = candidate("1", None, None);
        let filters = MatchFilters {
            exclude_user_ids: vec!["1".to_string()],
            ..Default::default()
        };
        assert!(!matches_basic_constraints(&profile, &filters));
    }

    #[test]
    fn test_gender_preference_filtered() {
        let filters = MatchFilters {
            genders: vec![Gender::Female],
            ..Default::default()
        };

        assert!(matches_basic_constraints(
            &candidate("1", Some(Gender::Female), None),
            &filters
        ));
        assert!(!matches_basic_constraints(
            &candidate("2", Some(Gender::Male), None),
            &filters
        ));
        // Unknown gender cannot satisfy a stated preference
        assert!(!matches_basic_constraints(&candidate("3", None, None), &filters));
    }

    #[test]
    fn test_city_filter_is_case_insensitive() {
        let filters = MatchFilters {
            city: Some("tel aviv".to_string()),
            ..Default::default()
        };

        assert!(matches_basic_constraints(
            &candidate("1", None, Some("Tel Aviv")),
            &filters
        ));
        assert!(!matches_basic_constraints(
            &candidate("2", None, Some("Haifa")),
            &filters
        ));
        assert!(!matches_basic_constraints(&candidate("3", None, None), &filters));
    }
}
