use serde::{Deserialize, Serialize};

/// How acceptable a partner's attribute is to the answering user.
///
/// "prefer-not" is a soft signal, not a hard block: the scorer never drops
/// a candidate to zero for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tolerance {
    NoProblem,
    PreferNot,
}

/// Diet-related tolerance. `KosherOnly` is the single hard constraint in
/// the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietTolerance {
    NoProblem,
    PreferNotVegan,
    KosherOnly,
}

/// Stated stance towards an older/younger partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeStance {
    NoProblem,
    PreferNot,
    Forbid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietType {
    Unrestricted,
    Vegetarian,
    Vegan,
    Kosher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifestyle {
    Calm,
    Active,
    Spontaneous,
    Homebody,
    Social,
}

/// What the user expects their home to feel like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HomeVibe {
    QuietStudious,
    LivelySocial,
    NoPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningFrequency {
    Daily,
    FewTimesAWeek,
    Weekly,
    WhenNeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostingPreference {
    Often,
    Sometimes,
    Rarely,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CookingStyle {
    CooksDaily,
    CooksOften,
    CooksSometimes,
    RarelyCooks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Occupation {
    Student,
    Worker,
    Other,
}

/// One user's survey answers: self-attributes plus stated preferences about
/// a prospective roommate.
///
/// Every field is optional. `None` means "not provided", which is distinct
/// from an explicit `false`/value; the scorer treats the two differently.
/// Empty `hobbies`/`personality_tags` lists count as not provided (the
/// mobile survey submits an empty array when the question is skipped).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnswers {
    // Self-attributes
    #[serde(default)]
    pub is_smoker: Option<bool>,
    #[serde(default)]
    pub has_pet: Option<bool>,
    #[serde(default)]
    pub observes_sabbath: Option<bool>,
    #[serde(default)]
    pub keeps_kosher: Option<bool>,
    #[serde(default)]
    pub diet_type: Option<DietType>,
    #[serde(default)]
    pub lifestyle: Option<Lifestyle>,
    /// 1 (doesn't care) to 5 (very important).
    #[serde(default)]
    pub cleanliness_importance: Option<u8>,
    #[serde(default)]
    pub cleaning_frequency: Option<CleaningFrequency>,
    #[serde(default)]
    pub hosting_preference: Option<HostingPreference>,
    #[serde(default)]
    pub cooking_style: Option<CookingStyle>,
    #[serde(default)]
    pub home_vibe: Option<HomeVibe>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub personality_tags: Vec<String>,

    // Partner-preferences
    #[serde(default)]
    pub smoking_tolerance: Option<Tolerance>,
    #[serde(default)]
    pub pet_tolerance: Option<Tolerance>,
    #[serde(default)]
    pub sabbath_tolerance: Option<Tolerance>,
    #[serde(default)]
    pub diet_tolerance: Option<DietTolerance>,
    #[serde(default)]
    pub partner_age_stance: Option<AgeStance>,
    #[serde(default)]
    pub preferred_age_min: Option<u8>,
    #[serde(default)]
    pub preferred_age_max: Option<u8>,
}

/// A candidate roommate as seen by the matcher: profile header plus the
/// normalized survey answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub occupation: Option<Occupation>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub preferred_genders: Vec<Gender>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Monotonically bumped by the backend each time the survey is edited.
    /// Used only for cache keys, never by the scorer.
    #[serde(default)]
    pub survey_version: i64,
    #[serde(default)]
    pub answers: SurveyAnswers,
}

fn default_true() -> bool {
    true
}

/// Hard constraints applied before any scoring happens.
#[derive(Debug, Clone, Default)]
pub struct MatchFilters {
    pub genders: Vec<Gender>,
    pub city: Option<String>,
    pub exclude_user_ids: Vec<String>,
}

/// A candidate together with the computed compatibility percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub user_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub occupation: Option<Occupation>,
    pub city: Option<String>,
    pub compatibility: u8,
    pub shared_hobbies: Vec<String>,
}

/// Relative importance of each compatibility criterion.
///
/// The defaults are the canonical weight table; changing them changes the
/// meaning of published percentages, so overrides are meant for offline
/// experimentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionWeights {
    pub smoking: u32,
    pub pets: u32,
    pub sabbath: u32,
    pub kosher: u32,
    pub partner_age: u32,
    pub noise: u32,
    pub lifestyle: u32,
    pub cleanliness: u32,
    pub cooking: u32,
    pub hosting: u32,
    pub age_range: u32,
    pub hobbies: u32,
    pub personality: u32,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            smoking: 5,
            pets: 5,
            sabbath: 5,
            kosher: 5,
            partner_age: 5,
            noise: 5,
            lifestyle: 3,
            cleanliness: 3,
            cooking: 3,
            hosting: 3,
            age_range: 3,
            hobbies: 1,
            personality: 1,
        }
    }
}

/// Interaction between two users, mirrored to the backend for analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub user_id: String,
    pub target_user_id: String,
    pub event_type: InteractionKind,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Viewed,
    Liked,
    Skipped,
    Contacted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_tokens_are_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Tolerance::NoProblem).unwrap(),
            "\"no-problem\""
        );
        assert_eq!(
            serde_json::to_string(&DietTolerance::PreferNotVegan).unwrap(),
            "\"prefer-not-vegan\""
        );
        assert_eq!(
            serde_json::to_string(&HomeVibe::QuietStudious).unwrap(),
            "\"quiet-studious\""
        );
        assert_eq!(
            serde_json::to_string(&CookingStyle::RarelyCooks).unwrap(),
            "\"rarely-cooks\""
        );
    }

    #[test]
    fn absent_survey_fields_deserialize_to_none() {
        let answers: SurveyAnswers = serde_json::from_str("{}").unwrap();
        assert_eq!(answers.is_smoker, None);
        assert_eq!(answers.diet_tolerance, None);
        assert!(answers.hobbies.is_empty());
    }

    #[test]
    fn explicit_false_is_not_absent() {
        let answers: SurveyAnswers =
            serde_json::from_str(r#"{"isSmoker": false}"#).unwrap();
        assert_eq!(answers.is_smoker, Some(false));
    }

    #[test]
    fn default_weights_match_canonical_table() {
        let w = CriterionWeights::default();
        assert_eq!(w.smoking, 5);
        assert_eq!(w.noise, 5);
        assert_eq!(w.lifestyle, 3);
        assert_eq!(w.age_range, 3);
        assert_eq!(w.hobbies, 1);
        assert_eq!(w.personality, 1);
    }
}
