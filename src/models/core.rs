// src/models/core.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single extracted mention: surface form plus the type label assigned by
/// the upstream NER component. Two entities are the same iff both fields are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub word: String,
    /// Free-form label such as PERSON, LOCATION, ORGANIZATION. Upstream NER
    /// services emit this under the key `entity`.
    #[serde(alias = "entity")]
    pub entity_type: String,
}

impl NamedEntity {
    pub fn new(word: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            entity_type: entity_type.into(),
        }
    }

    /// Key used for type-map lookups: lower-cased, trimmed surface form.
    pub fn normalized_word(&self) -> String {
        self.word.trim().to_lowercase()
    }

    /// An entity with a blank surface form cannot participate in map-keying
    /// or matching and is passed through untouched wherever it appears.
    pub fn has_surface_form(&self) -> bool {
        !self.word.trim().is_empty()
    }
}

/// One source text together with the entities extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub source_text: String,
    pub entities: Vec<NamedEntity>,
}

/// Entity surface forms bucketed by type label.
///
/// Extraction order is preserved within each bucket, and `type_order` records
/// types by first appearance so that iteration over the groups is
/// deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct EntityGroups {
    by_type: HashMap<String, Vec<String>>,
    type_order: Vec<String>,
}

impl EntityGroups {
    /// Bucket `entities` by type. Entities without a surface form are skipped.
    pub fn from_entities(entities: &[NamedEntity]) -> Self {
        let mut by_type: HashMap<String, Vec<String>> = HashMap::new();
        let mut type_order: Vec<String> = Vec::new();
        for entity in entities {
            if !entity.has_surface_form() {
                continue;
            }
            if !by_type.contains_key(&entity.entity_type) {
                type_order.push(entity.entity_type.clone());
            }
            by_type
                .entry(entity.entity_type.clone())
                .or_default()
                .push(entity.word.clone());
        }
        Self { by_type, type_order }
    }

    /// Type labels in first-appearance order.
    pub fn types(&self) -> &[String] {
        &self.type_order
    }

    pub fn contains_type(&self, entity_type: &str) -> bool {
        self.by_type.contains_key(entity_type)
    }

    /// Surface forms of the given type, extraction order preserved. Empty
    /// slice when the type never occurred.
    pub fn forms_of(&self, entity_type: &str) -> &[String] {
        self.by_type
            .get(entity_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.type_order.is_empty()
    }

    /// Consume the groups into a key-sorted map for serialization.
    pub fn into_sorted_map(self) -> BTreeMap<String, Vec<String>> {
        self.by_type.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_word_trims_and_lowercases() {
        let entity = NamedEntity::new("  Ankara ", "LOCATION");
        assert_eq!(entity.normalized_word(), "ankara");
    }

    #[test]
    fn test_blank_word_has_no_surface_form() {
        assert!(!NamedEntity::new("   ", "PERSON").has_surface_form());
        assert!(NamedEntity::new("Biden", "PERSON").has_surface_form());
    }

    #[test]
    fn test_grouping_preserves_extraction_order() {
        let entities = vec![
            NamedEntity::new("Paris", "LOCATION"),
            NamedEntity::new("Biden", "PERSON"),
            NamedEntity::new("Ankara", "LOCATION"),
        ];
        let groups = EntityGroups::from_entities(&entities);
        assert_eq!(groups.types(), &["LOCATION", "PERSON"]);
        assert_eq!(groups.forms_of("LOCATION"), &["Paris", "Ankara"]);
        assert_eq!(groups.forms_of("PERSON"), &["Biden"]);
        assert!(groups.forms_of("ORGANIZATION").is_empty());
    }

    #[test]
    fn test_grouping_skips_blank_surface_forms() {
        let entities = vec![
            NamedEntity::new("", "PERSON"),
            NamedEntity::new("Biden", "PERSON"),
        ];
        let groups = EntityGroups::from_entities(&entities);
        assert_eq!(groups.forms_of("PERSON"), &["Biden"]);
    }

    #[test]
    fn test_wire_alias_for_entity_type() {
        let entity: NamedEntity =
            serde_json::from_str(r#"{"word": "Obama", "entity": "PERSON"}"#).unwrap();
        assert_eq!(entity.entity_type, "PERSON");
        let entity: NamedEntity =
            serde_json::from_str(r#"{"word": "Obama", "entity_type": "PERSON"}"#).unwrap();
        assert_eq!(entity.entity_type, "PERSON");
    }
}
