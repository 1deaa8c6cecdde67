// src/models/analysis.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Outcome of checking one reference-side entity against the comparison text.
///
/// `comparison_entity` is `None` when the comparison text had no candidate of
/// the same type at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityComparison {
    pub entity_type: String,
    pub input_entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_entity: Option<String>,
    pub matches: bool,
    pub explanation: String,
}

/// Aggregate result of one engine invocation. Built fresh per call and handed
/// back to the caller; nothing here outlives the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsAnalysisReport {
    pub entity_comparisons: Vec<EntityComparison>,
    pub similarity_score: f64,
    pub discrepancies: Vec<String>,
    /// Reference-side surface forms grouped by type, extraction order kept
    /// within each bucket.
    pub extracted_entities: BTreeMap<String, Vec<String>>,
}

impl NewsAnalysisReport {
    pub fn match_count(&self) -> usize {
        self.entity_comparisons.iter().filter(|c| c.matches).count()
    }

    pub fn discrepancy_count(&self) -> usize {
        self.entity_comparisons
            .iter()
            .filter(|c| !c.matches)
            .count()
    }
}

/// One orchestrated analysis run: the engine report wrapped with run metadata
/// and the human-readable verdict.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    pub run_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub verdict: String,
    pub report: NewsAnalysisReport,
}
