// src/extraction/cache.rs
use log::info;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::core::NamedEntity;

// Default cache size - can be configured via environment variable
const DEFAULT_CACHE_SIZE: usize = 1000;

/// A service for caching extraction results to avoid redundant NER calls.
/// Keys are SHA-256 digests of the source text, so arbitrarily long articles
/// stay cheap to look up.
pub struct ExtractionCacheService {
    entity_cache: LruCache<String, Vec<NamedEntity>>,

    // Stats
    pub hits: usize,
    pub misses: usize,
}

impl ExtractionCacheService {
    /// Create a new extraction cache with the size configured via
    /// `EXTRACTION_CACHE_SIZE` (default 1000).
    pub fn new() -> Self {
        let cache_size = std::env::var("EXTRACTION_CACHE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_SIZE);

        info!(
            "Initializing ExtractionCacheService with cache size: {}",
            cache_size
        );
        Self::with_capacity(cache_size)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entity_cache: LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap()),
            hits: 0,
            misses: 0,
        }
    }

    /// Cache key for a source text
    pub fn cache_key(text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    pub fn get(&mut self, text: &str) -> Option<Vec<NamedEntity>> {
        let key = Self::cache_key(text);
        if let Some(entities) = self.entity_cache.get(&key) {
            self.hits += 1;
            if self.hits % 100 == 0 {
                info!(
                    "ExtractionCacheService stats - hits: {}, misses: {}, hit rate: {:.2}%",
                    self.hits,
                    self.misses,
                    (self.hits as f64 / (self.hits + self.misses) as f64) * 100.0
                );
            }
            return Some(entities.clone());
        }
        self.misses += 1;
        None
    }

    pub fn put(&mut self, text: &str, entities: Vec<NamedEntity>) {
        self.entity_cache.put(Self::cache_key(text), entities);
    }
}

pub type SharedExtractionCache = Arc<Mutex<ExtractionCacheService>>;

pub fn create_shared_cache() -> SharedExtractionCache {
    Arc::new(Mutex::new(ExtractionCacheService::new()))
}
