use async_trait::async_trait;

use crate::domain::{DomainError, EmbeddingConfig};

/// Generates fixed-dimension vector embeddings from text.
///
/// The same service (and therefore the same model and dimension) is used for
/// both indexing and querying.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// One vector per input, same order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    fn config(&self) -> &EmbeddingConfig;
}
