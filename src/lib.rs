//! Entity consistency engine for cross-checking news claims.
//!
//! Given the named entities extracted from an input claim and from a
//! candidate corroborating document, the engine reconciles entity type
//! labels using the claim as the trusted reference, pairs entities by edit
//! distance within each type, classifies every pair, and produces an
//! aggregate similarity score plus a human-readable discrepancy list.
//!
//! Entity extraction itself is an external collaborator behind the
//! [`extraction::ner_client::EntityExtractor`] trait; the engine only ever
//! sees plain entity lists.

pub mod analysis;
pub mod extraction;
pub mod matching;
pub mod models;
pub mod utils;

pub use matching::manager::{run_entity_analysis, AnalysisOptions};
pub use matching::normalize::normalize_entity_types;
pub use models::analysis::{AnalysisRun, EntityComparison, NewsAnalysisReport};
pub use models::core::{ExtractedDocument, NamedEntity};
