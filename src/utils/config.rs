// src/utils/config.rs
use log::debug;
use std::env;

use crate::matching::manager::AnalysisOptions;

/// Engine-level configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub normalize_types: bool,
}

impl AnalysisConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let normalize_types = env::var("NORMALIZE_ENTITY_TYPES")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        debug!("Analysis config: normalize_types={}", normalize_types);
        Self { normalize_types }
    }

    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            normalize_types: self.normalize_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::remove_var("NORMALIZE_ENTITY_TYPES");
        let config = AnalysisConfig::from_env();
        assert!(config.normalize_types);
        assert!(config.options().normalize_types);

        env::set_var("NORMALIZE_ENTITY_TYPES", "false");
        let config = AnalysisConfig::from_env();
        assert!(!config.normalize_types);

        // Garbage values fall back to the default.
        env::set_var("NORMALIZE_ENTITY_TYPES", "maybe");
        let config = AnalysisConfig::from_env();
        assert!(config.normalize_types);

        // Cleanup
        env::remove_var("NORMALIZE_ENTITY_TYPES");
    }
}
