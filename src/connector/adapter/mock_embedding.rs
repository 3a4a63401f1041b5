use async_trait::async_trait;
use rand::Rng;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig};

/// Deterministic offline [`EmbeddingService`]: unit vectors seeded from a
/// hash of the input text, so equal texts always embed identically.
pub struct MockEmbedding {
    config: EmbeddingConfig,
}

impl MockEmbedding {
    pub fn new() -> Self {
        Self {
            config: EmbeddingConfig::new("mock-embedding", 384),
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            config: EmbeddingConfig::new("mock-embedding", dimensions),
        }
    }

    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut vector: Vec<f32> = (0..self.config.dimensions())
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }

        vector
    }
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for MockEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.generate_embedding(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let vectors: Vec<Vec<f32>> = texts
            .iter()
            .map(|text| self.generate_embedding(text))
            .collect();
        debug!("Generated {} mock embeddings", vectors.len());
        Ok(vectors)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_embeds_identically() {
        let service = MockEmbedding::new();
        let first = service.embed_text("hello world").await.unwrap();
        let second = service.embed_text("hello world").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn respects_configured_dimensions() {
        let service = MockEmbedding::with_dimensions(128);
        let vector = service.embed_text("test").await.unwrap();
        assert_eq!(vector.len(), 128);
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let service = MockEmbedding::with_dimensions(16);
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let vectors = service.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], service.embed_text("alpha").await.unwrap());
        assert_eq!(vectors[1], service.embed_text("beta").await.unwrap());
    }

    #[tokio::test]
    async fn vectors_are_normalized() {
        let service = MockEmbedding::with_dimensions(32);
        let vector = service.embed_text("normalize me").await.unwrap();
        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }
}
