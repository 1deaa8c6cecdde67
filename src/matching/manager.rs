// src/matching/manager.rs
//
// Sequences the engine stages for one analysis: type normalization,
// per-type bucketing, pairwise comparison, scoring and discrepancy
// collection. Pure and synchronous; every invocation allocates its own type
// map and report, so concurrent callers never share state.

use log::debug;

use crate::matching::comparison::compare_entity_groups;
use crate::matching::normalize::normalize_entity_types;
use crate::matching::scoring::{calculate_similarity_score, collect_discrepancies};
use crate::models::analysis::NewsAnalysisReport;
use crate::models::core::{EntityGroups, NamedEntity};

/// Engine knobs. `normalize_types` controls whether comparison-side type
/// labels are reconciled against the reference before bucketing.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub normalize_types: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            normalize_types: true,
        }
    }
}

/// Run the full entity analysis of `candidate` against `reference`.
///
/// The reference side is the trusted input claim; the candidate side is the
/// document being checked. Inputs are never mutated.
pub fn run_entity_analysis(
    reference: &[NamedEntity],
    candidate: &[NamedEntity],
    options: &AnalysisOptions,
) -> NewsAnalysisReport {
    let normalized_candidate;
    let candidate_entities: &[NamedEntity] = if options.normalize_types {
        normalized_candidate = normalize_entity_types(reference, candidate);
        &normalized_candidate
    } else {
        candidate
    };

    let reference_groups = EntityGroups::from_entities(reference);
    let comparison_groups = EntityGroups::from_entities(candidate_entities);

    let entity_comparisons = compare_entity_groups(&reference_groups, &comparison_groups);
    let similarity_score = calculate_similarity_score(&entity_comparisons);
    let discrepancies = collect_discrepancies(&entity_comparisons);

    debug!(
        "Entity analysis: {} comparisons, {} discrepancies, score {:.3}",
        entity_comparisons.len(),
        discrepancies.len(),
        similarity_score
    );

    NewsAnalysisReport {
        entity_comparisons,
        similarity_score,
        discrepancies,
        extracted_entities: reference_groups.into_sorted_map(),
    }
}
