use std::sync::Arc;

use tracing::{info, warn};

use crate::application::use_cases::{
    GeneralTool, MathTool, QueryClassifier, RetrieveContextUseCase, WeatherTool, DEFAULT_TOP_K,
};
use crate::application::ChatClient;
use crate::domain::{AgentAnswer, DomainError, QueryCategory, RetrievedChunk};

const SYNTHESIS_SYSTEM_PROMPT: &str = "\
You are an AI assistant answering questions based on the provided documents. \
Use the information from these documents to answer the question. If the \
documents do not contain relevant information, say so and provide a general \
response.";

/// Where the orchestrator sends a question after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Weather,
    Math,
    General,
    Retrieval,
}

/// Routing is a pure function of the category; `Rag` is also the default
/// for anything the classifier could not pin down.
pub fn route_for(category: QueryCategory) -> RouteTarget {
    match category {
        QueryCategory::Weather => RouteTarget::Weather,
        QueryCategory::Math => RouteTarget::Math,
        QueryCategory::General => RouteTarget::General,
        QueryCategory::Rag => RouteTarget::Retrieval,
    }
}

/// Per-request coordinator: classify, route, execute, degrade.
///
/// Owns no persisted state. Failure text-coercion happens exactly once, here:
/// tools and retrieval return `Result` internally, and any non-fatal error
/// surfaces to the caller as an apologetic answer rather than an error.
/// `Configuration` and `InvalidInput` stay fatal and propagate.
pub struct AnswerQuestionUseCase {
    classifier: QueryClassifier,
    retrieval: RetrieveContextUseCase,
    weather_tool: WeatherTool,
    math_tool: MathTool,
    general_tool: GeneralTool,
    chat: Arc<dyn ChatClient>,
    top_k: usize,
}

impl AnswerQuestionUseCase {
    pub fn new(
        classifier: QueryClassifier,
        retrieval: RetrieveContextUseCase,
        weather_tool: WeatherTool,
        math_tool: MathTool,
        general_tool: GeneralTool,
        chat: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            classifier,
            retrieval,
            weather_tool,
            math_tool,
            general_tool,
            chat,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub async fn execute(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<AgentAnswer, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::invalid_input("question must not be empty"));
        }

        let classification = self.classifier.classify(question).await;
        info!(
            "Question classified as {} (confidence {:.2}): {}",
            classification.category(),
            classification.confidence(),
            classification.reasoning()
        );

        let category = classification.category();
        let mut used_fallback = false;

        let outcome = match route_for(category) {
            RouteTarget::Weather => self.weather_tool.run(question).await,
            RouteTarget::Math => self.math_tool.run(question).await,
            RouteTarget::General => self.general_tool.run(question).await,
            RouteTarget::Retrieval => {
                let chunks = self.retrieval.retrieve(question, self.top_k).await?;
                if chunks.is_empty() {
                    info!("No relevant chunks; falling back to the general tool");
                    used_fallback = true;
                    self.general_tool.run(question).await
                } else {
                    self.synthesize(question, &chunks).await
                }
            }
        };

        let text = match outcome {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Empty answer text; degrading to apology");
                apology(&DomainError::internal("model returned an empty answer"))
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Answer path failed: {e}. Degrading to apology.");
                apology(&e)
            }
        };

        Ok(AgentAnswer::new(text, category)
            .with_fallback(used_fallback)
            .with_session(session_id.map(str::to_string)))
    }

    async fn synthesize(
        &self,
        question: &str,
        chunks: &[RetrievedChunk],
    ) -> Result<String, DomainError> {
        let context = chunks
            .iter()
            .map(|chunk| format!("Document: {}", chunk.text()))
            .collect::<Vec<_>>()
            .join("\n\n");

        let user = format!("Documents:\n{context}\n\nQuestion: {question}\n\nAnswer:");
        self.chat.complete(SYNTHESIS_SYSTEM_PROMPT, &user).await
    }
}

fn apology(error: &DomainError) -> String {
    format!("I encountered an error while processing your query: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_is_a_pure_category_mapping() {
        assert_eq!(route_for(QueryCategory::Weather), RouteTarget::Weather);
        assert_eq!(route_for(QueryCategory::Math), RouteTarget::Math);
        assert_eq!(route_for(QueryCategory::General), RouteTarget::General);
        assert_eq!(route_for(QueryCategory::Rag), RouteTarget::Retrieval);
    }

    #[test]
    fn apology_embeds_the_error_message() {
        let text = apology(&DomainError::transport("connection reset"));
        assert!(text.starts_with("I encountered an error"));
        assert!(text.contains("connection reset"));
    }
}
