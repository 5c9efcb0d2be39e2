//! Per-criterion comparison rules.
//!
//! Each function evaluates one direction of one criterion and returns a
//! score piece in [0, 1], or `None` when that direction carries no usable
//! signal at all. A partially-known direction yields the neutral 0.5:
//! missing data reduces confidence, it never disqualifies.

use crate::core::similarity::{jaccard_similarity, range_similarity};
use crate::models::{
    AgeStance, CookingStyle, DietTolerance, DietType, HomeVibe, HostingPreference, Lifestyle,
    Tolerance,
};

/// Span shared by the cleanliness scale and the derived noise levels.
const SCALE_SPAN: f64 = 5.0;

/// Years past a stated age bound that still count as a near-miss.
const AGE_RANGE_GRACE_YEARS: u8 = 2;

/// Binary tolerance vs. boolean attribute (smoking, pets, sabbath).
///
/// An unstated tolerance accepts anything; "prefer-not" degrades a `true`
/// or unknown attribute to 0.5 rather than rejecting it.
pub fn tolerance_piece(tolerance: Option<Tolerance>, attribute: Option<bool>) -> Option<f64> {
    match (tolerance, attribute) {
        (None, None) => None,
        (Some(Tolerance::NoProblem), _) | (None, Some(_)) => Some(1.0),
        (Some(Tolerance::PreferNot), Some(false)) => Some(1.0),
        (Some(Tolerance::PreferNot), _) => Some(0.5),
    }
}

/// Diet tolerance vs. the other side's kosher/diet attributes.
///
/// "kosher-only" is the one hard constraint: a known non-kosher partner
/// scores 0. An unknown kosher status under it still scores 0.5.
pub fn diet_piece(
    tolerance: Option<DietTolerance>,
    keeps_kosher: Option<bool>,
    diet: Option<DietType>,
) -> Option<f64> {
    match tolerance {
        None => {
            if keeps_kosher.is_none() && diet.is_none() {
                None
            } else {
                Some(1.0)
            }
        }
        Some(DietTolerance::NoProblem) => Some(1.0),
        Some(DietTolerance::PreferNotVegan) => {
            if diet == Some(DietType::Vegan) {
                Some(0.5)
            } else {
                Some(1.0)
            }
        }
        Some(DietTolerance::KosherOnly) => match keeps_kosher {
            Some(true) => Some(1.0),
            Some(false) => Some(0.0),
            None => Some(0.5),
        },
    }
}

/// A stated stance about partner age, judged on its own.
///
/// Any stated reservation flattens to 0.5: there is no behavioural data to
/// sharpen the distinction between "prefer-not" and "forbid".
pub fn age_stance_piece(stance: Option<AgeStance>) -> Option<f64> {
    match stance {
        None => None,
        Some(AgeStance::NoProblem) => Some(1.0),
        Some(AgeStance::PreferNot) | Some(AgeStance::Forbid) => Some(0.5),
    }
}

/// Desired noise level implied by a home-vibe expectation.
fn desired_noise_level(vibe: HomeVibe) -> Option<f64> {
    match vibe {
        HomeVibe::QuietStudious => Some(1.0),
        HomeVibe::LivelySocial => Some(5.0),
        HomeVibe::NoPreference => None,
    }
}

/// Noise level a lifestyle tends to produce.
fn lifestyle_noise_level(lifestyle: Lifestyle) -> f64 {
    match lifestyle {
        Lifestyle::Calm | Lifestyle::Homebody => 2.0,
        Lifestyle::Active | Lifestyle::Social | Lifestyle::Spontaneous => 4.0,
    }
}

/// One side's vibe expectation against the other side's lifestyle-derived
/// noise level.
pub fn noise_piece(vibe: Option<HomeVibe>, lifestyle: Option<Lifestyle>) -> Option<f64> {
    let wanted = vibe.and_then(desired_noise_level);
    let produced = lifestyle.map(lifestyle_noise_level);

    match (wanted, produced) {
        (Some(a), Some(b)) => Some(range_similarity(a, b, SCALE_SPAN)),
        (None, None) => None,
        _ => Some(0.5),
    }
}

/// Categorical match with similarity clusters: identical values score 1,
/// values in the same cluster 0.5, values in different clusters 0.
fn categorical_piece<T, F>(a: Option<T>, b: Option<T>, same_cluster: F) -> Option<f64>
where
    T: PartialEq + Copy,
    F: Fn(T, T) -> bool,
{
    match (a, b) {
        (None, None) => None,
        (Some(a), Some(b)) => {
            if a == b {
                Some(1.0)
            } else if same_cluster(a, b) {
                Some(0.5)
            } else {
                Some(0.0)
            }
        }
        _ => Some(0.5),
    }
}

fn lifestyle_cluster(value: Lifestyle) -> u8 {
    match value {
        Lifestyle::Calm | Lifestyle::Homebody => 0,
        Lifestyle::Active | Lifestyle::Social | Lifestyle::Spontaneous => 1,
    }
}

pub fn lifestyle_piece(a: Option<Lifestyle>, b: Option<Lifestyle>) -> Option<f64> {
    categorical_piece(a, b, |a, b| lifestyle_cluster(a) == lifestyle_cluster(b))
}

fn cooking_cluster(value: CookingStyle) -> u8 {
    match value {
        CookingStyle::CooksDaily | CookingStyle::CooksOften => 0,
        CookingStyle::CooksSometimes | CookingStyle::RarelyCooks => 1,
    }
}

pub fn cooking_piece(a: Option<CookingStyle>, b: Option<CookingStyle>) -> Option<f64> {
    categorical_piece(a, b, |a, b| cooking_cluster(a) == cooking_cluster(b))
}

fn hosting_cluster(value: HostingPreference) -> u8 {
    match value {
        HostingPreference::Often | HostingPreference::Sometimes => 0,
        HostingPreference::Rarely | HostingPreference::Never => 1,
    }
}

pub fn hosting_piece(a: Option<HostingPreference>, b: Option<HostingPreference>) -> Option<f64> {
    categorical_piece(a, b, |a, b| hosting_cluster(a) == hosting_cluster(b))
}

/// Range similarity over two 1-5 scale answers (cleanliness importance).
pub fn scale_piece(a: Option<u8>, b: Option<u8>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (Some(a), Some(b)) => Some(range_similarity(a as f64, b as f64, SCALE_SPAN)),
        _ => Some(0.5),
    }
}

/// The other side's age against one side's stated [min, max] preference.
///
/// A miss within the grace window scores 0.5; further out scores 0. Any
/// missing part of the comparison is neutral.
pub fn age_range_piece(min: Option<u8>, max: Option<u8>, age: Option<u8>) -> Option<f64> {
    match (min, max, age) {
        (None, None, None) => None,
        (Some(min), Some(max), Some(age)) => {
            if age >= min && age <= max {
                Some(1.0)
            } else if age < min && min - age <= AGE_RANGE_GRACE_YEARS {
                Some(0.5)
            } else if age > max && age - max <= AGE_RANGE_GRACE_YEARS {
                Some(0.5)
            } else {
                Some(0.0)
            }
        }
        _ => Some(0.5),
    }
}

/// Jaccard similarity over interest sets (hobbies, personality tags).
///
/// One empty set cannot be assessed and is neutral; two empty sets carry no
/// signal.
pub fn set_piece(a: &[String], b: &[String]) -> Option<f64> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => None,
        (true, false) | (false, true) => Some(0.5),
        (false, false) => Some(jaccard_similarity(a, b)),
    }
}
