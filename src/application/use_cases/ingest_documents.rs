use std::sync::Arc;

use futures_util::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::application::{DocumentSource, EmbeddingService, VectorIndex};
use crate::domain::{DocumentChunk, DomainError, IngestReport, IndexRecord};

/// Metadata keys the index accepts, with their required shapes.
/// Anything else is a configuration error, not a silent drop.
const ALLOWED_STRING_KEYS: [&str; 2] = ["source", "title"];
const ALLOWED_INTEGER_KEYS: [&str; 2] = ["page", "chunk"];
const ALLOWED_STRING_LIST_KEYS: [&str; 1] = ["tags"];

/// Reserved for the chunk text itself; sources must not supply it.
const TEXT_KEY: &str = "text";

/// Batch tunables. Embedding batches are deliberately smaller than upsert
/// batches: the embedding batch width bounds concurrent model calls (rate
/// limiting), while upserts are cheap bulk writes.
#[derive(Debug, Clone, Copy)]
pub struct IngestConfig {
    pub embed_batch_size: usize,
    pub upsert_batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            embed_batch_size: 8,
            upsert_batch_size: 32,
        }
    }
}

/// Embeds and upserts the document corpus into the vector index.
///
/// Ingestion is best-effort per chunk: a failed embedding call degrades that
/// one chunk to a zero vector instead of aborting the run. Record ids are
/// `doc_{n}` with `n` counted monotonically across the whole run, so a
/// re-ingestion overwrites the previous records in place.
pub struct IngestDocumentsUseCase {
    source: Arc<dyn DocumentSource>,
    embedding_service: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    config: IngestConfig,
}

impl IngestDocumentsUseCase {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        embedding_service: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            source,
            embedding_service,
            index,
            config: IngestConfig::default(),
        }
    }

    pub fn with_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn execute(&self, force_reindex: bool) -> Result<IngestReport, DomainError> {
        if force_reindex {
            info!("Force reindex requested; dropping existing index");
            self.index.drop_index().await?;
        }

        self.index.ensure_ready().await?;

        let load = self.source.load().await?;
        info!(
            "Loaded {} documents into {} chunks",
            load.document_count,
            load.chunks.len()
        );

        if load.chunks.is_empty() {
            return Ok(IngestReport {
                documents: load.document_count,
                chunks: 0,
            });
        }

        let records = self.embed_chunks(&load.chunks).await?;

        for batch in records.chunks(self.config.upsert_batch_size.max(1)) {
            self.index.upsert(batch).await?;
        }

        info!("Ingestion complete: {} records upserted", records.len());

        Ok(IngestReport {
            documents: load.document_count,
            chunks: records.len(),
        })
    }

    /// Embed all chunks and build their index records.
    ///
    /// Within a batch the per-chunk embedding calls run concurrently
    /// (fan-out/fan-in); batches themselves run sequentially, bounding peak
    /// concurrency to one batch width.
    async fn embed_chunks(&self, chunks: &[DocumentChunk]) -> Result<Vec<IndexRecord>, DomainError> {
        let embedding_config = self.embedding_service.config().clone();

        let progress = ProgressBar::new(chunks.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress.set_message("embedding");

        let mut records = Vec::with_capacity(chunks.len());
        let mut next_id = 0usize;
        let mut degraded = 0usize;

        for batch in chunks.chunks(self.config.embed_batch_size.max(1)) {
            let embeddings = join_all(
                batch
                    .iter()
                    .map(|chunk| self.embedding_service.embed_text(chunk.text())),
            )
            .await;

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                let vector = match embedding {
                    Ok(vector) => vector,
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!("Embedding failed for record doc_{next_id}: {e}. Using zero vector.");
                        degraded += 1;
                        embedding_config.zero_vector()
                    }
                };

                let metadata = sanitize_metadata(chunk)?;
                records.push(IndexRecord::new(format!("doc_{next_id}"), vector, metadata));
                next_id += 1;
                progress.inc(1);
            }
        }

        progress.finish_with_message("done");

        if degraded > 0 {
            warn!("{degraded} of {} chunks were ingested with zero vectors", chunks.len());
        }

        Ok(records)
    }
}

/// Validate chunk metadata against the closed allow-list and flatten it into
/// the map the index stores. The chunk text goes under the reserved `text`
/// key so queries can recover it from hits.
pub fn sanitize_metadata(chunk: &DocumentChunk) -> Result<Map<String, Value>, DomainError> {
    let mut sanitized = Map::new();

    for (key, value) in chunk.metadata() {
        if key == TEXT_KEY {
            return Err(DomainError::configuration(format!(
                "metadata key '{TEXT_KEY}' is reserved for chunk text"
            )));
        }

        let valid = if ALLOWED_STRING_KEYS.contains(&key.as_str()) {
            value.is_string()
        } else if ALLOWED_INTEGER_KEYS.contains(&key.as_str()) {
            value.as_u64().is_some()
        } else if ALLOWED_STRING_LIST_KEYS.contains(&key.as_str()) {
            value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string))
        } else {
            return Err(DomainError::configuration(format!(
                "metadata key '{key}' is not in the permitted schema"
            )));
        };

        if !valid {
            return Err(DomainError::configuration(format!(
                "metadata key '{key}' has an invalid type: {value}"
            )));
        }

        sanitized.insert(key.clone(), value.clone());
    }

    sanitized.insert(TEXT_KEY.to_string(), Value::String(chunk.text().to_string()));
    Ok(sanitized)
}
