// Integration tests for Dira Algo

use dira_algo::core::Matcher;
use dira_algo::models::{
    CandidateProfile, Gender, MatchFilters, SurveyAnswers, Tolerance,
};
use dira_algo::services::normalize::{candidate_from_raw, RawProfileRecord};
use dira_algo::services::{SupabaseClient, SupabaseError, SupabaseTables};

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
            cleanliness_importance: Some(5),
            age: Some(25),
            preferred_age_min: Some(22),
            preferred_age_max: Some(30),
            hobbies: vec!["music".to_string(), "hiking".to_string()],
            ..Default::default()
        },
    }
}

fn candidate(
    id: &str,
    gender: Gender,
    city: &str,
    smoker: bool,
    cleanliness: u8,
    age: u8,
) -> CandidateProfile {
    CandidateProfile {
        user_id: id.to_string(),
        name: format!("User {}", id),
        gender: Some(gender),
        occupation: None,
        city: Some(city.to_string()),
        preferred_genders: vec![],
        is_active: true,
        survey_version: 1,
        answers: SurveyAnswers {
            is_smoker: Some(smoker),
            cleanliness_importance: Some(cleanliness),
            age: Some(age),
            hobbies: vec!["music".to_string()],
            ..Default::default()
        },
    }
}

#[test]
fn test_integration_end_to_end_matching() {
    let matcher = Matcher::with_default_weights();
    let seeker = seeker();
    let filters = MatchFilters {
        genders: seeker.preferred_genders.clone(),
        city: seeker.city.clone(),
        ..Default::default()
    };

    let candidates = vec![
        candidate("1", Gender::Female, "Tel Aviv", false, 5, 25), // Great match
        candidate("2", Gender::Female, "Tel Aviv", false, 4, 27), // Good match
        candidate("3", Gender::Female, "Tel Aviv", true, 2, 29),  // Weaker match
        candidate("4", Gender::Male, "Tel Aviv", false, 5, 25),   // Wrong gender
        candidate("5", Gender::Female, "Haifa", false, 5, 25),    // Wrong city
    ];

    let result = matcher.find_matches(&seeker, &filters, candidates, 10);

    assert_eq!(result.matches.len(), 3);
    assert_eq!(result.total_candidates, 5);

    // All surviving matches are female
    for m in &result.matches {
        assert_eq!(m.gender, Some(Gender::Female));
    }

    // Sorted by score descending
    for pair in result.matches.windows(2) {
        assert!(
            pair[0].compatibility >= pair[1].compatibility,
            "matches not sorted by score"
        );
    }

    // The clean non-smoker with identical answers ranks first
    assert_eq!(result.matches[0].user_id, "1");
}

#[test]
fn test_integration_raw_records_flow_into_ranking() {
    // Simulates the real pipeline: loosely-typed backend rows are
    // normalized at the boundary, then ranked.
    let raw = serde_json::json!({
        "user_id": "raw-1",
        "name": "Dana",
        "gender": "נקבה",
        "city": "Tel Aviv",
        "is_active": true,
        "survey_version": 4,
        "survey_answers": [
            {
                "is_smoker": false,
                "cleanliness_importance": 5,
                "age": 26,
                "smoking_tolerance": "אין בעיה",
                "partner_age_range": "22-30",
                "hobbies": ["Music"]
            }
        ]
    });

    let record: RawProfileRecord = serde_json::from_value(raw).unwrap();
    let profile = candidate_from_raw(record);

    assert_eq!(profile.gender, Some(Gender::Female));
    assert_eq!(profile.answers.smoking_tolerance, Some(Tolerance::NoProblem));
    assert_eq!(profile.answers.preferred_age_min, Some(22));

    let matcher = Matcher::with_default_weights();
    let result = matcher.find_matches(&seeker(), &MatchFilters::default(), vec![profile], 10);

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].user_id, "raw-1");
    assert!(result.matches[0].compatibility >= 80);
    assert_eq!(result.matches[0].shared_hobbies, vec!["music"]);
}

#[test]
fn test_score_range_over_pool() {
    let matcher = Matcher::with_default_weights();
    let seeker = seeker();

    let candidates: Vec<CandidateProfile> = (0..50)
        .map(|i| {
            candidate(
                &format!("{:02}", i),
                Gender::Female,
                "Tel Aviv",
                i % 3 == 0,
                1 + (i % 5) as u8,
                20 + (i % 15) as u8,
            )
        })
        .collect();

    let result = matcher.find_matches(&seeker, &MatchFilters::default(), candidates, 50);

    for m in &result.matches {
        assert!(m.compatibility <= 100, "score {} out of range", m.compatibility);
    }
}

#[test]
fn test_max_limit_enforcement() {
    let matcher = Matcher::with_default_weights();
    let seeker = seeker();

    let candidates: Vec<CandidateProfile> = (0..50)
        .map(|i| candidate(&i.to_string(), Gender::Female, "Tel Aviv", false, 4, 25))
        .collect();

    let result = matcher.find_matches(&seeker, &MatchFilters::default(), candidates, 10);

    assert!(result.matches.len() <= 10, "should not exceed limit of 10");
}

fn test_tables() -> SupabaseTables {
    SupabaseTables {
        profiles: "profiles".to_string(),
        surveys: "survey_answers".to_string(),
        interactions: "interactions".to_string(),
    }
}

#[tokio::test]
async fn test_supabase_client_fetches_and_normalizes() {
    let mut server = mockito::Server::new_async().await;

    let body = serde_json::json!([
        {
            "user_id": "u1",
            "name": "Noa",
            "gender": "female",
            "occupation": "סטודנטית",
            "city": "Tel Aviv",
            "preferred_genders": ["female"],
            "is_active": true,
            "survey_version": 2,
            "survey_answers": [
                {
                    "is_smoker": false,
                    "keeps_kosher": true,
                    "diet_type": "כשר",
                    "smoking_tolerance": "מעדיפה שלא",
                    "cleanliness_importance": 4,
                    "partner_age_range": "22-28",
                    "hobbies": ["Music", "hiking"]
                }
            ]
        }
    ]);

    let mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = SupabaseClient::new(server.url(), "test-key".to_string(), test_tables());

    let profile = client.get_candidate("u1").await.unwrap();
    mock.assert_async().await;

    assert_eq!(profile.user_id, "u1");
    assert_eq!(profile.gender, Some(Gender::Female));
    assert_eq!(profile.answers.keeps_kosher, Some(true));
    assert_eq!(profile.answers.smoking_tolerance, Some(Tolerance::PreferNot));
    assert_eq!(profile.answers.preferred_age_min, Some(22));
    assert_eq!(profile.answers.preferred_age_max, Some(28));
    assert_eq!(profile.answers.hobbies, vec!["music", "hiking"]);
}

#[tokio::test]
async fn test_supabase_client_missing_profile_is_not_found() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = SupabaseClient::new(server.url(), "test-key".to_string(), test_tables());

    let result = client.get_candidate("missing").await;
    assert!(matches!(result, Err(SupabaseError::NotFound(_))));
}

#[tokio::test]
async fn test_supabase_client_surfaces_api_errors() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = SupabaseClient::new(server.url(), "test-key".to_string(), test_tables());

    let result = client.get_candidate("u1").await;
    assert!(matches!(result, Err(SupabaseError::ApiError(_))));
}
