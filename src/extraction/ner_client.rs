// src/extraction/ner_client.rs
//
// HTTP client for the external NER collaborator. The collaborator contract
// is lenient by design: extraction failures degrade to an empty entity list
// so a flaky NER service can never abort an analysis.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error, warn};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

use crate::models::core::{ExtractedDocument, NamedEntity};

const DEFAULT_NER_API_URL: &str = "http://localhost:8000/extract";
const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const RETRY_BACKOFF_MS: u64 = 500;
const RETRY_JITTER_MS: u64 = 250;

/// Named-entity extraction collaborator. Implementations return one document
/// per input text and degrade to empty entity lists on failure; the engine
/// treats "no entities" as valid input, never as an error.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract(&self, texts: &[String]) -> Vec<ExtractedDocument>;
}

/// Configuration for the NER service client
#[derive(Debug, Clone)]
pub struct NerClientConfig {
    pub api_url: String,
    pub max_retries: usize,
    pub timeout_seconds: u64,
}

impl NerClientConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("NER_API_URL").unwrap_or_else(|_| DEFAULT_NER_API_URL.to_string()),
            max_retries: env::var("NER_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
            timeout_seconds: env::var("NER_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Serialize)]
struct NerRequest<'a> {
    texts: &'a [String],
}

/// One item of the NER service response. `url` and `title` are populated by
/// deployments that extract from fetched pages rather than raw text.
#[derive(Debug, Deserialize)]
struct NerApiResponseItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entities: Vec<NamedEntity>,
}

/// HTTP implementation of [`EntityExtractor`] against the NER service.
pub struct NerClient {
    config: NerClientConfig,
    http_client: Client,
}

impl NerClient {
    pub fn new(config: NerClientConfig) -> Result<Self> {
        Url::parse(&config.api_url)
            .with_context(|| format!("Invalid NER API URL: {}", config.api_url))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client for NER service")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn request_extraction(&self, texts: &[String]) -> Result<Vec<NerApiResponseItem>> {
        let response = self
            .http_client
            .post(&self.config.api_url)
            .json(&NerRequest { texts })
            .send()
            .await
            .context("Failed to send request to NER service")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "NER service returned status: {}",
                response.status()
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse NER service response")
    }

    fn pair_with_texts(
        texts: &[String],
        items: Vec<NerApiResponseItem>,
    ) -> Vec<ExtractedDocument> {
        for item in &items {
            if item.url.is_some() || item.title.is_some() {
                debug!(
                    "NER result for url={:?} title={:?}: {} entities",
                    item.url,
                    item.title,
                    item.entities.len()
                );
            }
        }

        let mut items = items.into_iter();
        texts
            .iter()
            .map(|text| ExtractedDocument {
                source_text: text.clone(),
                entities: items.next().map(|item| item.entities).unwrap_or_default(),
            })
            .collect()
    }
}

#[async_trait]
impl EntityExtractor for NerClient {
    async fn extract(&self, texts: &[String]) -> Vec<ExtractedDocument> {
        if texts.is_empty() {
            return Vec::new();
        }

        let mut last_error = None;
        for attempt in 1..=self.config.max_retries {
            match self.request_extraction(texts).await {
                Ok(items) => {
                    if items.len() != texts.len() {
                        warn!(
                            "NER service returned {} results for {} texts",
                            items.len(),
                            texts.len()
                        );
                    }
                    return Self::pair_with_texts(texts, items);
                }
                Err(e) => {
                    warn!("NER extraction attempt {} failed: {}", attempt, e);
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        let jitter = rand::thread_rng().gen_range(0..RETRY_JITTER_MS);
                        tokio::time::sleep(Duration::from_millis(
                            RETRY_BACKOFF_MS * attempt as u64 + jitter,
                        ))
                        .await;
                    }
                }
            }
        }

        error!(
            "NER service unavailable after {} attempts ({}); continuing with no entities",
            self.config.max_retries,
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string())
        );
        texts
            .iter()
            .map(|text| ExtractedDocument {
                source_text: text.clone(),
                entities: Vec::new(),
            })
            .collect()
    }
}
