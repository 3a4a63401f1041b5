use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::IndexMatch;

/// A retrieved context chunk, ranked by similarity descending.
///
/// Immutable read replica of indexed data; the index remains the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    text: String,
    metadata: Map<String, Value>,
    score: f32,
}

impl RetrievedChunk {
    pub fn new(text: impl Into<String>, metadata: Map<String, Value>, score: f32) -> Self {
        Self {
            text: text.into(),
            metadata,
            score,
        }
    }

    /// Lift a raw index hit into a retrieval result, pulling the stored text
    /// out of the `text` metadata field and carrying the rest through.
    pub fn from_match(hit: IndexMatch) -> Self {
        let mut metadata = hit.metadata;
        let text = metadata
            .remove("text")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        Self {
            text,
            metadata,
            score: hit.score,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_match_extracts_text_and_keeps_other_metadata() {
        let mut metadata = Map::new();
        metadata.insert("text".to_string(), json!("the quick brown fox"));
        metadata.insert("source".to_string(), json!("animals.md"));

        let chunk = RetrievedChunk::from_match(IndexMatch {
            id: "doc_3".to_string(),
            score: 0.82,
            metadata,
        });

        assert_eq!(chunk.text(), "the quick brown fox");
        assert_eq!(chunk.score(), 0.82);
        assert!(chunk.metadata().get("text").is_none());
        assert_eq!(chunk.metadata()["source"], "animals.md");
    }

    #[test]
    fn from_match_tolerates_missing_text_field() {
        let chunk = RetrievedChunk::from_match(IndexMatch {
            id: "doc_0".to_string(),
            score: 0.5,
            metadata: Map::new(),
        });
        assert!(chunk.text().is_empty());
    }
}
