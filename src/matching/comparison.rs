// src/matching/comparison.rs
//
// Pairs each reference-side entity with its nearest same-type entity on the
// comparison side and classifies the pair. Matching is type-scoped on
// purpose: a PERSON is never allowed to pair with a LOCATION no matter how
// similar the strings are.

use crate::matching::distance::find_best_match;
use crate::models::analysis::EntityComparison;
use crate::models::core::EntityGroups;

pub const EXPLANATION_MATCH: &str = "entities match";
pub const EXPLANATION_NOT_FOUND: &str = "not found in comparison text";

fn substitution_explanation(input_entity: &str, found: &str) -> String {
    format!(
        "entity differs: '{}' replaced with '{}'",
        input_entity, found
    )
}

/// Evaluate every reference-side surface form against the comparison side.
///
/// Types are visited in a pinned order: reference-side types by first
/// appearance, then comparison-only types by first appearance. Comparison-only
/// types contribute no records (there is no reference entity to check), but
/// the union is still walked so the record layout matches the inputs exactly.
///
/// A pair "matches" iff the nearest candidate's surface form equals the
/// reference form case-insensitively. The nearest candidate of the right type
/// is reported even when it denotes a different real-world referent; nearest
/// string is the documented match policy, not semantic identity.
pub fn compare_entity_groups(
    reference: &EntityGroups,
    comparison: &EntityGroups,
) -> Vec<EntityComparison> {
    let mut all_types: Vec<&str> = reference.types().iter().map(String::as_str).collect();
    for entity_type in comparison.types() {
        if !reference.contains_type(entity_type) {
            all_types.push(entity_type.as_str());
        }
    }

    let mut comparisons = Vec::new();
    for entity_type in all_types {
        let comparison_forms = comparison.forms_of(entity_type);
        for input_entity in reference.forms_of(entity_type) {
            comparisons.push(compare_one(entity_type, input_entity, comparison_forms));
        }
    }
    comparisons
}

fn compare_one(
    entity_type: &str,
    input_entity: &str,
    comparison_forms: &[String],
) -> EntityComparison {
    match find_best_match(input_entity, comparison_forms) {
        Some(found) => {
            let matches = input_entity.to_lowercase() == found.to_lowercase();
            let explanation = if matches {
                EXPLANATION_MATCH.to_string()
            } else {
                substitution_explanation(input_entity, found)
            };
            EntityComparison {
                entity_type: entity_type.to_string(),
                input_entity: input_entity.to_string(),
                comparison_entity: Some(found.to_string()),
                matches,
                explanation,
            }
        }
        None => EntityComparison {
            entity_type: entity_type.to_string(),
            input_entity: input_entity.to_string(),
            comparison_entity: None,
            matches: false,
            explanation: EXPLANATION_NOT_FOUND.to_string(),
        },
    }
}
