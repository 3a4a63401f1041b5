use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::VectorIndex;
use crate::domain::{DomainError, IndexMatch, IndexRecord};

const DEFAULT_CONTROL_URL: &str = "https://api.pinecone.io";
const DEFAULT_INDEX_NAME: &str = "ragpilot-documents";
const METRIC: &str = "cosine";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded wait for a freshly created index to become queryable.
const READY_ATTEMPTS: u32 = 30;
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(serde::Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: serde_json::Value,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
    status: IndexStatus,
}

#[derive(Deserialize)]
struct IndexStatus {
    ready: bool,
}

#[derive(serde::Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [IndexRecord],
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: u64,
}

/// [`VectorIndex`] over the Pinecone REST API.
///
/// The control plane (create/describe/delete) runs against the API base URL;
/// data-plane calls go to the per-index host reported by `describe`. The host
/// is resolved once through a mutex-guarded bootstrap, making `ensure_ready`
/// single-flight under concurrent first use; `409 Conflict` on create is
/// treated as another caller having won the race.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    control_url: String,
    index_name: String,
    dimensions: usize,
    /// Data-plane base URL; `None` until the index is known queryable.
    host: Mutex<Option<String>>,
}

impl PineconeIndex {
    pub fn new(
        api_key: impl Into<String>,
        index_name: impl Into<String>,
        dimensions: usize,
        control_url: impl Into<String>,
    ) -> Self {
        let control: String = control_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            control_url: control.trim_end_matches('/').to_string(),
            index_name: index_name.into(),
            dimensions,
            host: Mutex::new(None),
        }
    }

    pub fn from_env(dimensions: usize) -> Result<Self, DomainError> {
        let key = std::env::var("PINECONE_API_KEY")
            .map_err(|_| DomainError::configuration("PINECONE_API_KEY is not set"))?;
        let name =
            std::env::var("PINECONE_INDEX").unwrap_or_else(|_| DEFAULT_INDEX_NAME.to_string());
        let control = std::env::var("PINECONE_CONTROL_URL")
            .unwrap_or_else(|_| DEFAULT_CONTROL_URL.to_string());
        Ok(Self::new(key, name, dimensions, control))
    }

    fn check_dimensions(&self, len: usize, what: &str) -> Result<(), DomainError> {
        if len != self.dimensions {
            return Err(DomainError::configuration(format!(
                "PineconeIndex: {what} has dimension {len}, index '{}' expects {}",
                self.index_name, self.dimensions
            )));
        }
        Ok(())
    }

    async fn describe(&self) -> Result<Option<DescribeIndexResponse>, DomainError> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("PineconeIndex: describe failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let described = response.json().await.map_err(|e| {
                    DomainError::malformed(format!("PineconeIndex: describe response: {e}"))
                })?;
                Ok(Some(described))
            }
            status => Err(DomainError::transport(format!(
                "PineconeIndex: describe returned {status}"
            ))),
        }
    }

    async fn create(&self) -> Result<(), DomainError> {
        let request = CreateIndexRequest {
            name: &self.index_name,
            dimension: self.dimensions,
            metric: METRIC,
            spec: serde_json::json!({
                "serverless": { "cloud": "aws", "region": "us-east-1" }
            }),
        };

        let url = format!("{}/indexes", self.control_url);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("PineconeIndex: create failed: {e}")))?;

        match response.status() {
            // Another caller created it first; the poll loop takes it from here.
            StatusCode::CONFLICT => {
                debug!("Index '{}' already exists", self.index_name);
                Ok(())
            }
            status if status.is_success() => {
                info!("Created index '{}' ({METRIC}, dim {})", self.index_name, self.dimensions);
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!("PineconeIndex: create returned {status}: {body}");
                Err(DomainError::transport(format!(
                    "PineconeIndex: create returned {status}"
                )))
            }
        }
    }

    /// Resolve the data-plane host, creating the index and waiting for
    /// readiness when needed. Caller must hold the `host` lock.
    async fn bootstrap(&self) -> Result<String, DomainError> {
        let mut created = false;
        for attempt in 0..READY_ATTEMPTS {
            match self.describe().await? {
                Some(described) if described.status.ready => {
                    if described.host.starts_with("http") {
                        return Ok(described.host);
                    }
                    return Ok(format!("https://{}", described.host));
                }
                Some(_) => {
                    debug!(
                        "Index '{}' not ready yet (attempt {attempt})",
                        self.index_name
                    );
                }
                None if !created => {
                    self.create().await?;
                    created = true;
                }
                None => {}
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        Err(DomainError::transport(format!(
            "PineconeIndex: index '{}' not ready after {READY_ATTEMPTS} attempts",
            self.index_name
        )))
    }

    async fn data_host(&self) -> Result<String, DomainError> {
        let mut host = self.host.lock().await;
        if let Some(ref resolved) = *host {
            return Ok(resolved.clone());
        }
        let resolved = self.bootstrap().await?;
        *host = Some(resolved.clone());
        Ok(resolved)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn ensure_ready(&self) -> Result<(), DomainError> {
        self.data_host().await.map(|_| ())
    }

    async fn upsert(&self, records: &[IndexRecord]) -> Result<(), DomainError> {
        if records.is_empty() {
            return Ok(());
        }
        for record in records {
            self.check_dimensions(record.dimensions(), "record vector")?;
        }

        let host = self.data_host().await?;
        let response = self
            .client
            .post(format!("{host}/vectors/upsert"))
            .header("Api-Key", &self.api_key)
            .json(&UpsertRequest { vectors: records })
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("PineconeIndex: upsert failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(DomainError::transport(format!(
                "PineconeIndex: upsert returned {status}"
            )));
        }

        debug!("Upserted {} records to '{}'", records.len(), self.index_name);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<IndexMatch>, DomainError> {
        self.check_dimensions(vector.len(), "query vector")?;

        let host = self.data_host().await?;
        let response = self
            .client
            .post(format!("{host}/query"))
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
            })
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("PineconeIndex: query failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(DomainError::transport(format!(
                "PineconeIndex: query returned {status}"
            )));
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            DomainError::malformed(format!("PineconeIndex: query response: {e}"))
        })?;
        Ok(parsed.matches)
    }

    async fn drop_index(&self) -> Result<(), DomainError> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        let response = self
            .client
            .delete(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("PineconeIndex: delete failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("Index '{}' does not exist; nothing to drop", self.index_name);
            }
            status if status.is_success() => {
                info!("Dropped index '{}'", self.index_name);
            }
            status => {
                return Err(DomainError::transport(format!(
                    "PineconeIndex: delete returned {status}"
                )));
            }
        }

        // Invalidate the cached host so the next call re-bootstraps.
        *self.host.lock().await = None;
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let host = self.data_host().await?;
        let response = self
            .client
            .post(format!("{host}/describe_index_stats"))
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("PineconeIndex: stats failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(DomainError::transport(format!(
                "PineconeIndex: stats returned {status}"
            )));
        }

        let stats: StatsResponse = response.json().await.map_err(|e| {
            DomainError::malformed(format!("PineconeIndex: stats response: {e}"))
        })?;
        Ok(stats.total_vector_count)
    }
}
