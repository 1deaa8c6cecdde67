// src/matching/scoring.rs
use crate::models::analysis::EntityComparison;

/// Placeholder used in discrepancy lines when no candidate existed.
pub const MISSING_COMPARISON_PLACEHOLDER: &str = "none";

/// Fraction of comparisons that matched, in `[0, 1]`. Defined as exactly
/// `0.0` for an empty comparison list.
pub fn calculate_similarity_score(comparisons: &[EntityComparison]) -> f64 {
    if comparisons.is_empty() {
        return 0.0;
    }
    let match_count = comparisons.iter().filter(|c| c.matches).count();
    match_count as f64 / comparisons.len() as f64
}

/// One human-readable line per non-matching comparison, in comparison order.
pub fn collect_discrepancies(comparisons: &[EntityComparison]) -> Vec<String> {
    comparisons
        .iter()
        .filter(|c| !c.matches)
        .map(|c| {
            format!(
                "{}: '{}' -> '{}' ({})",
                c.entity_type,
                c.input_entity,
                c.comparison_entity
                    .as_deref()
                    .unwrap_or(MISSING_COMPARISON_PLACEHOLDER),
                c.explanation
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::comparison::{EXPLANATION_MATCH, EXPLANATION_NOT_FOUND};

    fn record(
        entity_type: &str,
        input: &str,
        comparison: Option<&str>,
        matches: bool,
        explanation: &str,
    ) -> EntityComparison {
        EntityComparison {
            entity_type: entity_type.to_string(),
            input_entity: input.to_string(),
            comparison_entity: comparison.map(str::to_string),
            matches,
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn test_empty_comparisons_score_zero() {
        assert_eq!(calculate_similarity_score(&[]), 0.0);
    }

    #[test]
    fn test_score_is_match_fraction() {
        let comparisons = vec![
            record("PERSON", "Biden", Some("biden"), true, EXPLANATION_MATCH),
            record("PERSON", "Obama", Some("Obana"), false, "x"),
            record("LOCATION", "Paris", None, false, EXPLANATION_NOT_FOUND),
            record("LOCATION", "Ankara", Some("Ankara"), true, EXPLANATION_MATCH),
        ];
        let score = calculate_similarity_score(&comparisons);
        assert!((score - 0.5).abs() < f64::EPSILON);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_discrepancy_line_for_missing_candidate() {
        let comparisons = vec![record(
            "LOCATION",
            "Paris",
            None,
            false,
            EXPLANATION_NOT_FOUND,
        )];
        let lines = collect_discrepancies(&comparisons);
        assert_eq!(
            lines,
            vec!["LOCATION: 'Paris' -> 'none' (not found in comparison text)"]
        );
    }

    #[test]
    fn test_discrepancy_lines_skip_matches_and_keep_order() {
        let comparisons = vec![
            record("PERSON", "Biden", Some("biden"), true, EXPLANATION_MATCH),
            record(
                "PERSON",
                "Obama",
                Some("Obana"),
                false,
                "entity differs: 'Obama' replaced with 'Obana'",
            ),
            record("LOCATION", "Paris", None, false, EXPLANATION_NOT_FOUND),
        ];
        let lines = collect_discrepancies(&comparisons);
        assert_eq!(
            lines,
            vec![
                "PERSON: 'Obama' -> 'Obana' (entity differs: 'Obama' replaced with 'Obana')",
                "LOCATION: 'Paris' -> 'none' (not found in comparison text)",
            ]
        );
    }
}
