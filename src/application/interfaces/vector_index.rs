use async_trait::async_trait;

use crate::domain::{DomainError, IndexMatch, IndexRecord};

/// Durable store of (vector, metadata) pairs with top-k similarity search.
///
/// Implementations fix a vector dimension at construction; upserting or
/// querying with a vector of a different length is a
/// [`DomainError::Configuration`]: fail fast, never truncate or pad.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Idempotent bootstrap: create the backing index if absent and block
    /// (bounded) until it is queryable. Safe under concurrent first use.
    async fn ensure_ready(&self) -> Result<(), DomainError>;

    /// Re-upserting an existing id overwrites the stored record.
    async fn upsert(&self, records: &[IndexRecord]) -> Result<(), DomainError>;

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<IndexMatch>, DomainError>;

    /// Delete the whole index; no-op when it does not exist.
    async fn drop_index(&self) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
