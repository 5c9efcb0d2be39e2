//! Normalization of raw backend records into the closed survey model.
//!
//! The mobile client historically stored several enumerated answers as
//! free-form strings, in English and Hebrew. Everything is resolved to
//! canonical enum variants here, once, at the data boundary; unrecognized
//! tokens are logged and dropped to "not provided" instead of being passed
//! through, so the scorer never has to distinguish a typo from a mismatch.

use serde::Deserialize;

use crate::models::{
    AgeStance, CandidateProfile, CleaningFrequency, CookingStyle, DietTolerance, DietType, Gender,
    HomeVibe, HostingPreference, Lifestyle, Occupation, SurveyAnswers, Tolerance,
};

/// Survey row as stored by the backend, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSurveyRecord {
    #[serde(default)]
    pub is_smoker: Option<bool>,
    #[serde(default)]
    pub has_pet: Option<bool>,
    #[serde(default)]
    pub observes_sabbath: Option<bool>,
    #[serde(default)]
    pub keeps_kosher: Option<bool>,
    #[serde(default)]
    pub diet_type: Option<String>,
    #[serde(default)]
    pub lifestyle: Option<String>,
    #[serde(default)]
    pub cleanliness_importance: Option<i64>,
    #[serde(default)]
    pub cleaning_frequency: Option<String>,
    #[serde(default)]
    pub hosting_preference: Option<String>,
    #[serde(default)]
    pub cooking_style: Option<String>,
    #[serde(default)]
    pub home_vibe: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub personality_tags: Vec<String>,
    #[serde(default)]
    pub smoking_tolerance: Option<String>,
    #[serde(default)]
    pub pet_tolerance: Option<String>,
    #[serde(default)]
    pub sabbath_tolerance: Option<String>,
    #[serde(default)]
    pub diet_tolerance: Option<String>,
    #[serde(default)]
    pub partner_age_stance: Option<String>,
    /// Free text, e.g. "22-28", "24 – 30" or "25+".
    #[serde(default)]
    pub partner_age_range: Option<String>,
}

/// Profile row with the survey embedded, as returned by the backend's
/// `select=*,survey_answers(*)` query.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProfileRecord {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub preferred_genders: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub survey_version: Option<i64>,
    #[serde(default)]
    pub survey_answers: Vec<RawSurveyRecord>,
}

fn default_true() -> bool {
    true
}

fn canon(input: &str) -> String {
    input.trim().to_lowercase()
}

fn unrecognized<T>(field: &str, raw: &str) -> Option<T> {
    tracing::warn!("dropping unrecognized {} value: {:?}", field, raw);
    None
}

pub fn normalize_gender(input: &str) -> Option<Gender> {
    match canon(input).as_str() {
        "" => None,
        "male" | "m" | "man" | "זכר" | "גבר" => Some(Gender::Male),
        "female" | "f" | "woman" | "נקבה" | "אישה" | "בחורה" => Some(Gender::Female),
        "other" | "אחר" => Some(Gender::Other),
        _ => unrecognized("gender", input),
    }
}

pub fn normalize_occupation(input: &str) -> Option<Occupation> {
    match canon(input).as_str() {
        "" => None,
        "student" | "סטודנט" | "סטודנטית" => Some(Occupation::Student),
        "worker" | "working" | "employed" | "עובד" | "עובדת" => Some(Occupation::Worker),
        "other" | "אחר" => Some(Occupation::Other),
        _ => unrecognized("occupation", input),
    }
}

pub fn normalize_tolerance(input: &str) -> Option<Tolerance> {
    match canon(input).as_str() {
        "" => None,
        "no-problem" | "no_problem" | "ok" | "fine" | "לא מפריע" | "אין בעיה" => {
            Some(Tolerance::NoProblem)
        }
        "prefer-not" | "prefer_not" | "rather not" | "מעדיף שלא" | "מעדיפה שלא"
        | "עדיף שלא" => Some(Tolerance::PreferNot),
        _ => unrecognized("tolerance", input),
    }
}

pub fn normalize_diet_tolerance(input: &str) -> Option<DietTolerance> {
    match canon(input).as_str() {
        "" => None,
        "no-problem" | "no_problem" | "ok" | "fine" | "לא מפריע" | "אין בעיה" => {
            Some(DietTolerance::NoProblem)
        }
        "prefer-not-vegan" | "prefer_not_vegan" | "מעדיף לא טבעוני"
        | "מעדיפה לא טבעונית" => Some(DietTolerance::PreferNotVegan),
        "kosher-only" | "kosher_only" | "kosher only" | "רק כשר" | "כשר בלבד" => {
            Some(DietTolerance::KosherOnly)
        }
        _ => unrecognized("diet tolerance", input),
    }
}

pub fn normalize_diet_type(input: &str) -> Option<DietType> {
    match canon(input).as_str() {
        "" => None,
        "unrestricted" | "none" | "everything" | "אוכל הכל" | "הכל" => {
            Some(DietType::Unrestricted)
        }
        "vegetarian" | "צמחוני" | "צמחונית" => Some(DietType::Vegetarian),
        "vegan" | "טבעוני" | "טבעונית" => Some(DietType::Vegan),
        "kosher" | "כשר" | "כשרה" => Some(DietType::Kosher),
        _ => unrecognized("diet type", input),
    }
}

pub fn normalize_lifestyle(input: &str) -> Option<Lifestyle> {
    match canon(input).as_str() {
        "" => None,
        "calm" | "relaxed" | "רגוע" | "רגועה" => Some(Lifestyle::Calm),
        "active" | "פעיל" | "פעילה" => Some(Lifestyle::Active),
        "spontaneous" | "ספונטני" | "ספונטנית" => Some(Lifestyle::Spontaneous),
        "homebody" | "home body" | "ביתי" | "ביתית" => Some(Lifestyle::Homebody),
        "social" | "חברותי" | "חברותית" => Some(Lifestyle::Social),
        _ => unrecognized("lifestyle", input),
    }
}

pub fn normalize_home_vibe(input: &str) -> Option<HomeVibe> {
    match canon(input).as_str() {
        "" => None,
        "quiet-studious" | "quiet_studious" | "quiet" | "studious" | "שקט" | "שקט ולימודי" => {
            Some(HomeVibe::QuietStudious)
        }
        "lively-social" | "lively_social" | "lively" | "תוסס" | "חברתי ותוסס" => {
            Some(HomeVibe::LivelySocial)
        }
        "no-preference" | "no_preference" | "none" | "אין העדפה" | "לא משנה" => {
            Some(HomeVibe::NoPreference)
        }
        _ => unrecognized("home vibe", input),
    }
}

pub fn normalize_cleaning_frequency(input: &str) -> Option<CleaningFrequency> {
    match canon(input).as_str() {
        "" => None,
        "daily" | "every day" | "כל יום" => Some(CleaningFrequency::Daily),
        "few-times-a-week" | "few_times_a_week" | "few times a week" | "כמה פעמים בשבוע" => {
            Some(CleaningFrequency::FewTimesAWeek)
        }
        "weekly" | "once a week" | "פעם בשבוע" => Some(CleaningFrequency::Weekly),
        "when-needed" | "when_needed" | "when needed" | "as needed" | "כשצריך" => {
            Some(CleaningFrequency::WhenNeeded)
        }
        _ => unrecognized("cleaning frequency", input),
    }
}

pub fn normalize_hosting_preference(input: &str) -> Option<HostingPreference> {
    match canon(input).as_str() {
        "" => None,
        "often" | "לעיתים קרובות" | "הרבה" => Some(HostingPreference::Often),
        "sometimes" | "לפעמים" => Some(HostingPreference::Sometimes),
        "rarely" | "לעיתים רחוקות" => Some(HostingPreference::Rarely),
        "never" | "אף פעם" | "בכלל לא" => Some(HostingPreference::Never),
        _ => unrecognized("hosting preference", input),
    }
}

pub fn normalize_cooking_style(input: &str) -> Option<CookingStyle> {
    match canon(input).as_str() {
        "" => None,
        "cooks-daily" | "cooks_daily" | "daily" | "כל יום" => Some(CookingStyle::CooksDaily),
        "cooks-often" | "cooks_often" | "often" | "הרבה" => Some(CookingStyle::CooksOften),
        "cooks-sometimes" | "cooks_sometimes" | "sometimes" | "לפעמים" => {
            Some(CookingStyle::CooksSometimes)
        }
        "rarely-cooks" | "rarely_cooks" | "rarely" | "never" | "כמעט ולא" | "בקושי" => {
            Some(CookingStyle::RarelyCooks)
        }
        _ => unrecognized("cooking style", input),
    }
}

pub fn normalize_age_stance(input: &str) -> Option<AgeStance> {
    match canon(input).as_str() {
        "" => None,
        "no-problem" | "no_problem" | "ok" | "fine" | "לא מפריע" | "אין בעיה" => {
            Some(AgeStance::NoProblem)
        }
        "prefer-not" | "prefer_not" | "מעדיף שלא" | "מעדיפה שלא" | "עדיף שלא" => {
            Some(AgeStance::PreferNot)
        }
        "forbid" | "no" | "אסור" | "לא מוכן" | "לא מוכנה" => Some(AgeStance::Forbid),
        _ => unrecognized("partner age stance", input),
    }
}

/// Parse a free-text age range into numeric bounds.
///
/// Accepts "22-28" (also with an en dash or surrounding spaces), "25+"
/// (open-ended) and a bare "25" (exact). Anything else is dropped.
pub fn parse_age_range(input: &str) -> (Option<u8>, Option<u8>) {
    let text = input.trim();
    if text.is_empty() {
        return (None, None);
    }

    if let Some(min_text) = text.strip_suffix('+') {
        return match min_text.trim().parse::<u8>() {
            Ok(min) => (Some(min), None),
            Err(_) => {
                tracing::warn!("dropping unparseable age range: {:?}", input);
                (None, None)
            }
        };
    }

    let parts: Vec<&str> = text
        .split(['-', '–'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [single] => match single.parse::<u8>() {
            Ok(age) => (Some(age), Some(age)),
            Err(_) => {
                tracing::warn!("dropping unparseable age range: {:?}", input);
                (None, None)
            }
        },
        [min_text, max_text] => {
            let min = min_text.parse::<u8>().ok();
            let max = max_text.parse::<u8>().ok();
            if min.is_none() && max.is_none() {
                tracing::warn!("dropping unparseable age range: {:?}", input);
            }
            (min, max)
        }
        _ => {
            tracing::warn!("dropping unparseable age range: {:?}", input);
            (None, None)
        }
    }
}

/// Cleanliness importance must land on the 1-5 scale; anything else is
/// treated as not provided.
fn normalize_scale(value: i64) -> Option<u8> {
    if (1..=5).contains(&value) {
        Some(value as u8)
    } else {
        tracing::warn!("dropping out-of-scale cleanliness value: {}", value);
        None
    }
}

/// Lowercase, trim and drop empty tags so Jaccard comparisons are
/// case-insensitive.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| canon(&t))
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Build canonical survey answers from a raw backend row.
pub fn survey_from_raw(raw: RawSurveyRecord) -> SurveyAnswers {
    let (preferred_age_min, preferred_age_max) = raw
        .partner_age_range
        .as_deref()
        .map(parse_age_range)
        .unwrap_or((None, None));

    SurveyAnswers {
        is_smoker: raw.is_smoker,
        has_pet: raw.has_pet,
        observes_sabbath: raw.observes_sabbath,
        keeps_kosher: raw.keeps_kosher,
        diet_type: raw.diet_type.as_deref().and_then(normalize_diet_type),
        lifestyle: raw.lifestyle.as_deref().and_then(normalize_lifestyle),
        cleanliness_importance: raw.cleanliness_importance.and_then(normalize_scale),
        cleaning_frequency: raw
            .cleaning_frequency
            .as_deref()
            .and_then(normalize_cleaning_frequency),
        hosting_preference: raw
            .hosting_preference
            .as_deref()
            .and_then(normalize_hosting_preference),
        cooking_style: raw.cooking_style.as_deref().and_then(normalize_cooking_style),
        home_vibe: raw.home_vibe.as_deref().and_then(normalize_home_vibe),
        age: raw.age.and_then(|a| u8::try_from(a).ok()),
        hobbies: clean_tags(raw.hobbies),
        personality_tags: clean_tags(raw.personality_tags),
        smoking_tolerance: raw.smoking_tolerance.as_deref().and_then(normalize_tolerance),
        pet_tolerance: raw.pet_tolerance.as_deref().and_then(normalize_tolerance),
        sabbath_tolerance: raw.sabbath_tolerance.as_deref().and_then(normalize_tolerance),
        diet_tolerance: raw.diet_tolerance.as_deref().and_then(normalize_diet_tolerance),
        partner_age_stance: raw
            .partner_age_stance
            .as_deref()
            .and_then(normalize_age_stance),
        preferred_age_min,
        preferred_age_max,
    }
}

/// Build a candidate profile from a raw backend row with its embedded
/// survey. A profile can exist before the survey is answered; the answers
/// then default to all-absent.
pub fn candidate_from_raw(raw: RawProfileRecord) -> CandidateProfile {
    let answers = raw
        .survey_answers
        .into_iter()
        .next()
        .map(survey_from_raw)
        .unwrap_or_default();

    CandidateProfile {
        name: raw.name.unwrap_or_else(|| raw.user_id.clone()),
        user_id: raw.user_id,
        gender: raw.gender.as_deref().and_then(normalize_gender),
        occupation: raw.occupation.as_deref().and_then(normalize_occupation),
        city: raw.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        preferred_genders: raw
            .preferred_genders
            .iter()
            .filter_map(|g| normalize_gender(g))
            .collect(),
        is_active: raw.is_active,
        survey_version: raw.survey_version.unwrap_or(0),
        answers,
    }
}
