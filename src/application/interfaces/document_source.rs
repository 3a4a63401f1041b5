use async_trait::async_trait;

use crate::domain::{CorpusLoad, DomainError};

/// Supplies document chunks to the ingestion entry point.
///
/// Chunk boundaries and splitting policy belong to the source; the core only
/// consumes the resulting chunks.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self) -> Result<CorpusLoad, DomainError>;
}
