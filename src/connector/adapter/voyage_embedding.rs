use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig};

const DEFAULT_BASE_URL: &str = "https://api.voyageai.com";
const EMBEDDINGS_PATH: &str = "/v1/embeddings";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    index: usize,
}

/// [`EmbeddingService`] over the Voyage AI embeddings API.
///
/// The configured dimension is enforced on every response: a vector of a
/// different length is a [`DomainError::Configuration`], since an index built
/// at one dimension can never be queried at another.
///
/// Environment configuration:
///
/// ```text
/// VOYAGE_API_KEY=pa-...
/// VOYAGE_MODEL=voyage-3
/// VOYAGE_BASE_URL=https://api.voyageai.com
/// ```
pub struct VoyageEmbedding {
    client: reqwest::Client,
    api_key: String,
    url: String,
    config: EmbeddingConfig,
}

impl VoyageEmbedding {
    pub fn new(api_key: impl Into<String>, config: EmbeddingConfig, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{EMBEDDINGS_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            url,
            config,
        }
    }

    pub fn from_env() -> Result<Self, DomainError> {
        let key = std::env::var("VOYAGE_API_KEY")
            .map_err(|_| DomainError::configuration("VOYAGE_API_KEY is not set"))?;
        let base =
            std::env::var("VOYAGE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let config = match std::env::var("VOYAGE_MODEL") {
            Ok(model) => EmbeddingConfig::new(model, EmbeddingConfig::default().dimensions()),
            Err(_) => EmbeddingConfig::default(),
        };
        Ok(Self::new(key, config, base))
    }

    async fn request(&self, input: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let request = ApiRequest {
            input,
            model: self.config.model_name(),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("VoyageEmbedding: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("VoyageEmbedding: API returned {status}: {body}");
            return Err(DomainError::transport(format!(
                "VoyageEmbedding: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::malformed(format!("VoyageEmbedding: failed to parse response: {e}"))
        })?;

        if api_response.data.len() != input.len() {
            return Err(DomainError::malformed(format!(
                "VoyageEmbedding: expected {} embeddings, got {}",
                input.len(),
                api_response.data.len()
            )));
        }

        // The API may return items out of order; restore input order by index.
        let mut vectors: Vec<Vec<f32>> = vec![Vec::new(); input.len()];
        for item in api_response.data {
            if item.embedding.len() != self.config.dimensions() {
                return Err(DomainError::configuration(format!(
                    "VoyageEmbedding: model {} returned dimension {}, index expects {}",
                    self.config.model_name(),
                    item.embedding.len(),
                    self.config.dimensions()
                )));
            }
            let slot = vectors.get_mut(item.index).ok_or_else(|| {
                DomainError::malformed(format!(
                    "VoyageEmbedding: embedding index {} out of range",
                    item.index
                ))
            })?;
            *slot = item.embedding;
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingService for VoyageEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let input = [text.to_string()];
        let mut vectors = self.request(&input).await?;
        vectors
            .pop()
            .ok_or_else(|| DomainError::malformed("VoyageEmbedding: empty response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.request(texts).await
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
