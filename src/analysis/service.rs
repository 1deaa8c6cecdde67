// src/analysis/service.rs
//
// Orchestration around the pure engine: extraction via the injected
// collaborator (cache-aware), engine invocation, and the run envelope with
// the human-readable verdict. All network concerns live behind the
// EntityExtractor trait; this layer never constructs its own clients.

use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, info};
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

use crate::extraction::cache::{create_shared_cache, SharedExtractionCache};
use crate::extraction::ner_client::EntityExtractor;
use crate::matching::manager::{run_entity_analysis, AnalysisOptions};
use crate::models::analysis::{AnalysisRun, NewsAnalysisReport};
use crate::models::core::NamedEntity;

const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;
const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.5;

pub struct NewsAnalysisService {
    extractor: Arc<dyn EntityExtractor>,
    cache: SharedExtractionCache,
    options: AnalysisOptions,
}

impl NewsAnalysisService {
    pub fn new(extractor: Arc<dyn EntityExtractor>, options: AnalysisOptions) -> Self {
        Self::with_cache(extractor, options, create_shared_cache())
    }

    pub fn with_cache(
        extractor: Arc<dyn EntityExtractor>,
        options: AnalysisOptions,
        cache: SharedExtractionCache,
    ) -> Self {
        Self {
            extractor,
            cache,
            options,
        }
    }

    /// Analyze one claim against one comparison document.
    pub async fn analyze_news(
        &self,
        input_news: &str,
        comparison_news: &str,
    ) -> Result<AnalysisRun> {
        info!("Analyzing news claim against one comparison document");
        let reference = self.extract_cached(input_news).await;
        let candidate = self.extract_cached(comparison_news).await;
        debug!(
            "Extracted {} reference and {} candidate entities",
            reference.len(),
            candidate.len()
        );

        let report = run_entity_analysis(&reference, &candidate, &self.options);
        Ok(self.wrap_report(report))
    }

    /// Analyze one claim against many candidate documents. Candidate
    /// extractions are issued concurrently; every run gets its own report
    /// and type map. Output order follows input order.
    pub async fn analyze_against_candidates(
        &self,
        input_news: &str,
        candidates: &[String],
    ) -> Result<Vec<AnalysisRun>> {
        info!(
            "Analyzing news claim against {} candidate documents",
            candidates.len()
        );
        let reference = self.extract_cached(input_news).await;
        let extractions = join_all(candidates.iter().map(|text| self.extract_cached(text))).await;

        let runs = extractions
            .into_iter()
            .map(|candidate| {
                let report = run_entity_analysis(&reference, &candidate, &self.options);
                self.wrap_report(report)
            })
            .collect();
        Ok(runs)
    }

    async fn extract_cached(&self, text: &str) -> Vec<NamedEntity> {
        {
            let mut cache = self.cache.lock().await;
            if let Some(entities) = cache.get(text) {
                return entities;
            }
        }

        let documents = self.extractor.extract(&[text.to_string()]).await;
        let entities = documents
            .into_iter()
            .next()
            .map(|document| document.entities)
            .unwrap_or_default();

        let mut cache = self.cache.lock().await;
        cache.put(text, entities.clone());
        entities
    }

    fn wrap_report(&self, report: NewsAnalysisReport) -> AnalysisRun {
        AnalysisRun {
            run_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            verdict: build_verdict(&report),
            report,
        }
    }
}

/// Render the fact-check verdict for a finished report. Confidence banding:
/// similarity >= 0.8 is high, >= 0.5 medium, below that low.
pub fn build_verdict(report: &NewsAnalysisReport) -> String {
    let confidence = if report.similarity_score >= HIGH_CONFIDENCE_THRESHOLD {
        "high"
    } else if report.similarity_score >= MEDIUM_CONFIDENCE_THRESHOLD {
        "medium"
    } else {
        "low"
    };
    let percent = report.similarity_score * 100.0;
    let discrepancy_count = report.discrepancy_count();

    if discrepancy_count == 0 {
        format!(
            "The claim is corroborated with {} confidence; entity similarity is {:.1}%.",
            confidence, percent
        )
    } else {
        format!(
            "{} entity discrepancies detected; entity similarity is {:.1}% ({} confidence). Review the discrepancy list.",
            discrepancy_count, percent, confidence
        )
    }
}

/// Order runs by descending similarity. The sort is stable, so ties keep
/// their input order.
pub fn rank_runs(mut runs: Vec<AnalysisRun>) -> Vec<AnalysisRun> {
    runs.sort_by(|a, b| {
        b.report
            .similarity_score
            .partial_cmp(&a.report.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::EntityComparison;
    use crate::models::core::ExtractedDocument;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct StaticExtractor {
        by_text: HashMap<String, Vec<NamedEntity>>,
        calls: AtomicUsize,
    }

    impl StaticExtractor {
        fn new(pairs: &[(&str, Vec<NamedEntity>)]) -> Self {
            Self {
                by_text: pairs
                    .iter()
                    .map(|(text, entities)| (text.to_string(), entities.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EntityExtractor for StaticExtractor {
        async fn extract(&self, texts: &[String]) -> Vec<ExtractedDocument> {
            self.calls.fetch_add(texts.len(), AtomicOrdering::SeqCst);
            texts
                .iter()
                .map(|text| ExtractedDocument {
                    source_text: text.clone(),
                    entities: self.by_text.get(text).cloned().unwrap_or_default(),
                })
                .collect()
        }
    }

    fn report_with(matches: usize, misses: usize, score: f64) -> NewsAnalysisReport {
        let mut entity_comparisons = Vec::new();
        for i in 0..matches + misses {
            entity_comparisons.push(EntityComparison {
                entity_type: "PERSON".to_string(),
                input_entity: format!("entity-{}", i),
                comparison_entity: None,
                matches: i < matches,
                explanation: String::new(),
            });
        }
        NewsAnalysisReport {
            entity_comparisons,
            similarity_score: score,
            discrepancies: Vec::new(),
            extracted_entities: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_analyze_news_end_to_end() {
        let extractor = StaticExtractor::new(&[
            (
                "claim",
                vec![
                    NamedEntity::new("Biden", "PERSON"),
                    NamedEntity::new("Paris", "LOCATION"),
                ],
            ),
            (
                "candidate",
                vec![
                    NamedEntity::new("biden", "PERSON"),
                    NamedEntity::new("Moscow", "LOCATION"),
                ],
            ),
        ]);
        let service =
            NewsAnalysisService::new(Arc::new(extractor), AnalysisOptions::default());

        let run = service.analyze_news("claim", "candidate").await.unwrap();
        assert_eq!(run.report.entity_comparisons.len(), 2);
        assert!((run.report.similarity_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(run.report.discrepancies.len(), 1);
        assert!(run.verdict.contains("1 entity discrepancies detected"));
    }

    #[tokio::test]
    async fn test_extraction_cache_prevents_repeat_calls() {
        let extractor = Arc::new(StaticExtractor::new(&[(
            "claim",
            vec![NamedEntity::new("Biden", "PERSON")],
        )]));
        let service =
            NewsAnalysisService::new(extractor.clone(), AnalysisOptions::default());

        // Same text on both sides: the second side must come from the cache.
        service.analyze_news("claim", "claim").await.unwrap();
        assert_eq!(extractor.calls.load(AtomicOrdering::SeqCst), 1);

        service.analyze_news("claim", "claim").await.unwrap();
        assert_eq!(extractor.calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_candidate_fanout_preserves_input_order() {
        let extractor = StaticExtractor::new(&[
            ("claim", vec![NamedEntity::new("Biden", "PERSON")]),
            ("good", vec![NamedEntity::new("Biden", "PERSON")]),
            ("bad", vec![NamedEntity::new("Trump", "PERSON")]),
        ]);
        let service =
            NewsAnalysisService::new(Arc::new(extractor), AnalysisOptions::default());

        let runs = service
            .analyze_against_candidates(
                "claim",
                &["bad".to_string(), "good".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].report.similarity_score < runs[1].report.similarity_score);
    }

    #[test]
    fn test_verdict_confidence_banding() {
        // Banding boundaries: 0.8 -> high, 0.5 -> medium, below -> low.
        assert!(build_verdict(&report_with(5, 0, 0.8)).contains("high confidence"));
        assert!(build_verdict(&report_with(1, 1, 0.5)).contains("medium confidence"));
        assert!(build_verdict(&report_with(0, 2, 0.0)).contains("low confidence"));
    }

    #[test]
    fn test_verdict_mentions_discrepancy_count() {
        let verdict = build_verdict(&report_with(1, 2, 1.0 / 3.0));
        assert!(verdict.starts_with("2 entity discrepancies detected"));

        let clean = build_verdict(&report_with(3, 0, 1.0));
        assert!(clean.contains("corroborated"));
    }

    #[test]
    fn test_rank_runs_descending_and_stable() {
        let make_run = |score: f64, verdict: &str| AnalysisRun {
            run_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            verdict: verdict.to_string(),
            report: report_with(0, 0, score),
        };
        let runs = vec![
            make_run(0.2, "a"),
            make_run(0.9, "b"),
            make_run(0.2, "c"),
        ];
        let ranked = rank_runs(runs);
        let verdicts: Vec<&str> = ranked.iter().map(|r| r.verdict.as_str()).collect();
        assert_eq!(verdicts, vec!["b", "a", "c"]);
    }
}
