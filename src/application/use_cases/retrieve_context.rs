use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{EmbeddingService, VectorIndex};
use crate::domain::{DomainError, RetrievedChunk};

/// Top-k default for context retrieval, used by every call site.
pub const DEFAULT_TOP_K: usize = 4;

/// Turns a question into a ranked list of relevant text chunks.
///
/// An empty result is normal control flow (index empty, nothing above the
/// backend's relevance cutoff, or an absorbed transport failure) and triggers
/// the orchestrator's general-tool fallback. Only fatal errors propagate.
pub struct RetrieveContextUseCase {
    embedding_service: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
}

impl RetrieveContextUseCase {
    pub fn new(embedding_service: Arc<dyn EmbeddingService>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedding_service,
            index,
        }
    }

    pub async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, DomainError> {
        let Some(()) = absorb(self.index.ensure_ready().await, "index bootstrap")? else {
            return Ok(vec![]);
        };

        let Some(vector) = absorb(
            self.embedding_service.embed_text(question).await,
            "query embedding",
        )?
        else {
            return Ok(vec![]);
        };

        let Some(hits) = absorb(self.index.query(&vector, top_k).await, "index query")? else {
            return Ok(vec![]);
        };

        let chunks: Vec<RetrievedChunk> = hits.into_iter().map(RetrievedChunk::from_match).collect();

        if chunks.is_empty() {
            info!("Retrieval found no relevant chunks");
        } else {
            debug!(
                "Retrieved {} chunks, top score {:.3}",
                chunks.len(),
                chunks[0].score()
            );
        }

        Ok(chunks)
    }
}

/// Absorb non-fatal failures into `None` (retrieval degrades to empty);
/// fatal ones propagate unchanged.
fn absorb<T>(result: Result<T, DomainError>, stage: &str) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("Retrieval {stage} failed: {e}. Returning empty result.");
            Ok(None)
        }
    }
}
