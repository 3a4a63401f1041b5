use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A unit of indexable text produced by the document pipeline.
///
/// Metadata arrives free-form from the loader and is validated against the
/// index's allow-listed schema at ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    text: String,
    metadata: Map<String, Value>,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

/// Everything a document source yields for one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct CorpusLoad {
    pub document_count: usize,
    pub chunks: Vec<DocumentChunk>,
}

/// Counts reported back to the caller of the ingestion entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
}
