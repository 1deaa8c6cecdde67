// src/matching/normalize.rs
//
// Type-label reconciliation between two entity extractions. The reference
// text is treated as ground truth: whenever a comparison-side entity has the
// same surface form (case-insensitive, trimmed) as a reference entity, its
// type label is rewritten to the reference's label. Surface forms are never
// altered.

use log::debug;
use std::collections::HashMap;

use crate::models::core::NamedEntity;

/// Mapping from normalized surface form to type label, built from one entity
/// list. On duplicate surface forms the last occurrence wins; which
/// occurrence *should* win is unspecified upstream, so the overwrite
/// semantics are kept as-is.
#[derive(Debug, Default)]
pub struct EntityTypeMap {
    map: HashMap<String, String>,
}

impl EntityTypeMap {
    /// Index `entities` by normalized surface form. Entities without a
    /// surface form are never indexed.
    pub fn from_entities(entities: &[NamedEntity]) -> Self {
        let mut map = HashMap::new();
        for entity in entities {
            if !entity.has_surface_form() {
                continue;
            }
            map.insert(entity.normalized_word(), entity.entity_type.clone());
        }
        Self { map }
    }

    pub fn type_of(&self, word: &str) -> Option<&str> {
        self.map.get(&word.trim().to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Rewrite the type labels of `candidates` using `reference` as the trusted
/// source. Candidate order is preserved; entities whose surface form is blank
/// or unknown to the reference pass through unchanged.
pub fn normalize_entity_types(
    reference: &[NamedEntity],
    candidates: &[NamedEntity],
) -> Vec<NamedEntity> {
    let type_map = EntityTypeMap::from_entities(reference);

    candidates
        .iter()
        .map(|candidate| {
            if !candidate.has_surface_form() {
                return candidate.clone();
            }
            match type_map.type_of(&candidate.word) {
                Some(reference_type) => {
                    if reference_type != candidate.entity_type {
                        debug!(
                            "Normalized entity type for '{}': {} -> {}",
                            candidate.word, candidate.entity_type, reference_type
                        );
                    }
                    NamedEntity::new(candidate.word.clone(), reference_type)
                }
                None => candidate.clone(),
            }
        })
        .collect()
}
