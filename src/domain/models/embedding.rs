use serde::{Deserialize, Serialize};

/// Configuration for the embedding model.
///
/// One config is shared by ingestion and querying so both sides embed into
/// the same vector space with the same fixed dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    model_name: String,
    dimensions: usize,
}

impl EmbeddingConfig {
    pub fn new(model_name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_name: model_name.into(),
            dimensions,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The substitute vector for a chunk whose embedding call failed.
    pub fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.dimensions]
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: "voyage-3".to_string(),
            dimensions: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_matches_configured_dimension() {
        let config = EmbeddingConfig::new("test-model", 8);
        let zero = config.zero_vector();
        assert_eq!(zero.len(), 8);
        assert!(zero.iter().all(|v| *v == 0.0));
    }
}
