use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A vector plus its sanitized metadata as persisted by the index.
///
/// Ids are unique across the index; re-upserting an existing id overwrites
/// the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    id: String,
    #[serde(rename = "values")]
    vector: Vec<f32>,
    metadata: Map<String, Value>,
}

impl IndexRecord {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, metadata: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// A raw nearest-neighbor hit returned by the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}
