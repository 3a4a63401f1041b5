use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::VectorIndex;
use crate::domain::{DomainError, IndexMatch, IndexRecord};

/// [`VectorIndex`] backed by a process-local map with exact cosine search.
///
/// The local/offline backend and the workhorse of the test suite. Enforces
/// the same fixed-dimension contract as the real backends.
pub struct InMemoryIndex {
    dimensions: usize,
    records: Mutex<HashMap<String, IndexRecord>>,
}

impl InMemoryIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            records: Mutex::new(HashMap::new()),
        }
    }

    fn check_dimensions(&self, len: usize, what: &str) -> Result<(), DomainError> {
        if len != self.dimensions {
            return Err(DomainError::configuration(format!(
                "InMemoryIndex: {what} has dimension {len}, index expects {}",
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn ensure_ready(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn upsert(&self, records: &[IndexRecord]) -> Result<(), DomainError> {
        for record in records {
            self.check_dimensions(record.dimensions(), "record vector")?;
        }

        let mut store = self.records.lock().await;
        for record in records {
            store.insert(record.id().to_string(), record.clone());
        }

        debug!("Upserted {} records in memory", records.len());
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<IndexMatch>, DomainError> {
        self.check_dimensions(vector.len(), "query vector")?;

        let store = self.records.lock().await;
        let mut scored: Vec<IndexMatch> = store
            .values()
            .map(|record| IndexMatch {
                id: record.id().to_string(),
                score: cosine_similarity(vector, record.vector()),
                metadata: record.metadata().clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn drop_index(&self) -> Result<(), DomainError> {
        self.records.lock().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.records.lock().await.len() as u64)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record(id: &str, vector: Vec<f32>, source: &str) -> IndexRecord {
        let mut metadata = Map::new();
        metadata.insert("text".to_string(), json!(format!("text of {id}")));
        metadata.insert("source".to_string(), json!(source));
        IndexRecord::new(id, vector, metadata)
    }

    #[tokio::test]
    async fn query_ranks_by_cosine_similarity() {
        let index = InMemoryIndex::new(3);
        index
            .upsert(&[
                record("doc_0", vec![1.0, 0.0, 0.0], "a.md"),
                record("doc_1", vec![0.0, 1.0, 0.0], "b.md"),
                record("doc_2", vec![0.9, 0.1, 0.0], "c.md"),
            ])
            .await
            .unwrap();

        let hits = index.query(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "doc_0");
        assert_eq!(hits[1].id, "doc_2");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_id() {
        let index = InMemoryIndex::new(2);
        index
            .upsert(&[record("doc_0", vec![1.0, 0.0], "old.md")])
            .await
            .unwrap();
        index
            .upsert(&[record("doc_0", vec![0.0, 1.0], "new.md")])
            .await
            .unwrap();

        assert_eq!(index.count().await.unwrap(), 1);
        let hits = index.query(&[0.0, 1.0], 1).await.unwrap();
        assert_eq!(hits[0].metadata["source"], "new.md");
    }

    #[tokio::test]
    async fn wrong_dimension_query_is_a_configuration_error() {
        let index = InMemoryIndex::new(4);
        let err = index.query(&[1.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }

    #[tokio::test]
    async fn wrong_dimension_upsert_is_a_configuration_error() {
        let index = InMemoryIndex::new(4);
        let err = index
            .upsert(&[record("doc_0", vec![1.0], "a.md")])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }

    #[tokio::test]
    async fn drop_index_clears_all_records_and_is_idempotent() {
        let index = InMemoryIndex::new(2);
        index
            .upsert(&[record("doc_0", vec![1.0, 0.0], "a.md")])
            .await
            .unwrap();

        index.drop_index().await.unwrap();
        index.drop_index().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ensure_ready_is_idempotent() {
        let index = InMemoryIndex::new(2);
        index.ensure_ready().await.unwrap();
        index.ensure_ready().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
