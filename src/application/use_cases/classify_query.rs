use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{extract_first_object, Classification, DomainError, QueryCategory};

const SYSTEM_PROMPT: &str = "\
You are a query classifier for a question-answering agent. Classify the user's \
question into exactly one of these categories:
- \"rag\": asking about information found in the indexed document corpus
- \"weather\": asking about weather conditions
- \"math\": asking to solve a mathematical problem
- \"general\": any other question

Respond with a JSON object of this shape and nothing else:
{\"type\": \"rag\" | \"weather\" | \"math\" | \"general\", \"confidence\": <number between 0 and 1>, \"reasoning\": \"<one sentence>\"}";

/// Shape the model is asked to emit. Parsed out of free-form response text.
#[derive(Deserialize)]
struct RawClassification {
    #[serde(rename = "type")]
    category: String,
    confidence: f32,
    #[serde(default)]
    reasoning: String,
}

/// Labels a question with a routing category and confidence.
///
/// Classification never fails the request: transport errors, unparseable
/// output, and missing fields all collapse to [`Classification::fallback`],
/// which routes to retrieval, the one branch with its own empty-result
/// fallback. One attempt per call, no retries.
pub struct QueryClassifier {
    chat: Arc<dyn ChatClient>,
}

impl QueryClassifier {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }

    pub async fn classify(&self, question: &str) -> Classification {
        match self.try_classify(question).await {
            Ok(classification) => classification,
            Err(e) => {
                warn!("Classification failed: {e}. Falling back to rag.");
                Classification::fallback()
            }
        }
    }

    async fn try_classify(&self, question: &str) -> Result<Classification, DomainError> {
        let response = self.chat.complete(SYSTEM_PROMPT, question).await?;
        debug!("Classifier raw response: {response}");
        Self::parse_response(&response)
    }

    fn parse_response(response: &str) -> Result<Classification, DomainError> {
        let payload = extract_first_object(response)?;
        let raw: RawClassification = serde_json::from_value(payload)
            .map_err(|e| DomainError::malformed(format!("classification shape: {e}")))?;

        if !(0.0..=1.0).contains(&raw.confidence) {
            return Err(DomainError::malformed(format!(
                "confidence {} outside [0, 1]",
                raw.confidence
            )));
        }

        Ok(Classification::new(
            QueryCategory::parse(&raw.category),
            raw.confidence,
            raw.reasoning,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json_response() {
        let c = QueryClassifier::parse_response(
            r#"{"type": "math", "confidence": 0.92, "reasoning": "asks for a sum"}"#,
        )
        .unwrap();
        assert_eq!(c.category(), QueryCategory::Math);
        assert_eq!(c.confidence(), 0.92);
        assert_eq!(c.reasoning(), "asks for a sum");
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let c = QueryClassifier::parse_response(
            "Here you go:\n```json\n{\"type\": \"weather\", \"confidence\": 0.8}\n```",
        )
        .unwrap();
        assert_eq!(c.category(), QueryCategory::Weather);
    }

    #[test]
    fn rejects_prose_without_payload() {
        assert!(QueryClassifier::parse_response("it is probably about math").is_err());
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let result =
            QueryClassifier::parse_response(r#"{"type": "rag", "confidence": 1.5}"#);
        assert!(matches!(result, Err(DomainError::MalformedOutput(_))));
    }

    #[test]
    fn rejects_missing_confidence() {
        assert!(QueryClassifier::parse_response(r#"{"type": "rag"}"#).is_err());
    }

    #[test]
    fn unknown_category_label_falls_back_to_rag() {
        let c = QueryClassifier::parse_response(
            r#"{"type": "smalltalk", "confidence": 0.6, "reasoning": "greeting"}"#,
        )
        .unwrap();
        assert_eq!(c.category(), QueryCategory::Rag);
    }
}
