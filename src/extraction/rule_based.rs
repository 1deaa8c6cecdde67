// src/extraction/rule_based.rs
//
// Offline fallback extractor. When no NER service is reachable, a handful of
// regex pattern families still recover the high-value entity classes from
// news text. Precision is deliberately modest; the comparison engine is
// tolerant of noisy extractions.

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::env;

use crate::extraction::ner_client::EntityExtractor;
use crate::models::core::{ExtractedDocument, NamedEntity};

// Capitalized multi-word sequences: "Joe Biden", "Recep Tayyip Erdogan".
static PERSON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").unwrap());

// Institutional names, either suffix-anchored ("Central Bank") or
// "X of Y" forms ("Ministry of Health").
static ORGANIZATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z]+\s+)+(?:Ministry|University|Hospital|Institute|Foundation|Association|Agency|Authority|Corporation|Company|Bank|Holding)\b|\b(?:Ministry|University|Department)\s+of(?:\s+[A-Z][A-Za-z]+)+",
    )
    .unwrap()
});

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d{1,2}[./-]\d{1,2}[./-]\d{2,4}\b|\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
    )
    .unwrap()
});

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,3}(?:,\d{3})*(?:\.\d+)?(?:\s*(?:thousand|million|billion|trillion))?\b")
        .unwrap()
});

static MONEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\d{1,3}(?:[.,]\d{3})*(?:[.,]\d+)?|\d+)\s*(?:(?:TL|USD|EUR|GBP|dollars?|euros?|pounds?|lira)\b|[$€₺£])",
    )
    .unwrap()
});

// Multi-word all-caps groups are kept as generic events ("WORLD CUP").
static EVENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2,}(?:\s+[A-Z]{2,})+\b").unwrap());

const DEFAULT_GAZETTEER: [&str; 16] = [
    "Istanbul",
    "Ankara",
    "Izmir",
    "London",
    "Paris",
    "Berlin",
    "New York",
    "Washington",
    "Moscow",
    "Beijing",
    "Tokyo",
    "Cairo",
    "Rome",
    "Madrid",
    "Brussels",
    "Athens",
];

/// Regex-based entity extractor with a configurable location gazetteer.
pub struct RuleBasedExtractor {
    location_regex: Regex,
}

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self::with_gazetteer(&DEFAULT_GAZETTEER.map(String::from))
    }

    /// Build an extractor whose LOCATION class matches exactly the given
    /// place names. Longer names are tried first so that multi-word places
    /// are not split by shorter alternatives.
    pub fn with_gazetteer(locations: &[String]) -> Self {
        let mut escaped: Vec<String> = locations
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(regex::escape)
            .collect();
        escaped.sort_by_key(|name| std::cmp::Reverse(name.len()));

        let pattern = if escaped.is_empty() {
            // Matches nothing; keeps the extraction loop uniform.
            r"\b\B".to_string()
        } else {
            format!(r"\b(?:{})\b", escaped.join("|"))
        };
        Self {
            location_regex: Regex::new(&pattern).unwrap(),
        }
    }

    /// Create an extractor from environment variables. `LOCATION_GAZETTEER`
    /// is a comma-separated list of place names overriding the default set.
    pub fn from_env() -> Self {
        match env::var("LOCATION_GAZETTEER") {
            Ok(raw) => {
                let locations: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                debug!("Rule-based extractor gazetteer override: {:?}", locations);
                Self::with_gazetteer(&locations)
            }
            Err(_) => Self::new(),
        }
    }

    /// Run every pattern family over `text`. Output order is pattern-family
    /// order, then match order; repeated (type, surface form) pairs keep
    /// their first occurrence only.
    pub fn extract_from_text(&self, text: &str) -> Vec<NamedEntity> {
        let families: [(&str, &Regex); 7] = [
            ("PERSON", &PERSON_REGEX),
            ("LOCATION", &self.location_regex),
            ("ORGANIZATION", &ORGANIZATION_REGEX),
            ("DATE", &DATE_REGEX),
            ("NUMBER", &NUMBER_REGEX),
            ("MONEY", &MONEY_REGEX),
            ("EVENT", &EVENT_REGEX),
        ];

        let mut entities = Vec::new();
        let mut seen: HashSet<(&str, String)> = HashSet::new();
        for (entity_type, regex) in families {
            for found in regex.find_iter(text) {
                let word = found.as_str().to_string();
                if seen.insert((entity_type, word.clone())) {
                    entities.push(NamedEntity::new(word, entity_type));
                }
            }
        }
        debug!("Rule-based extraction found {} entities", entities.len());
        entities
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityExtractor for RuleBasedExtractor {
    async fn extract(&self, texts: &[String]) -> Vec<ExtractedDocument> {
        texts
            .iter()
            .map(|text| ExtractedDocument {
                source_text: text.clone(),
                entities: self.extract_from_text(text),
            })
            .collect()
    }
}
