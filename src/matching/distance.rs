// src/matching/distance.rs
use strsim::levenshtein;

/// Case-insensitive Levenshtein distance over Unicode code points, unit cost
/// for insert/delete/substitute. No length normalization.
pub fn case_insensitive_levenshtein(a: &str, b: &str) -> usize {
    levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Pick the candidate with the minimum edit distance to `entity`.
///
/// Ties go to the earliest candidate in iteration order; the scan only
/// replaces the running best on a strictly smaller distance. Returns `None`
/// only when `candidates` is empty.
pub fn find_best_match<'a>(entity: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for candidate in candidates {
        let distance = case_insensitive_levenshtein(entity, candidate);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(candidate, _)| candidate)
}
