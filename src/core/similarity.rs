use std::collections::HashSet;

/// Linear similarity between two points on a bounded scale.
///
/// `1 - |a - b| / span`, clamped to [0, 1]. Both the cleanliness scale and
/// the derived noise levels use a span of 5.
#[inline]
pub fn range_similarity(a: f64, b: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    (1.0 - (a - b).abs() / span).clamp(0.0, 1.0)
}

/// Jaccard similarity of two string sets: |intersection| / |union|.
///
/// Duplicates within one list are counted once. Returns 1.0 for two
/// identical non-empty sets and 0.0 for disjoint ones; the caller decides
/// what an empty set means.
pub fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();

    intersection as f64 / union as f64
}
