pub mod cache;
pub mod ner_client;
pub mod rule_based;
