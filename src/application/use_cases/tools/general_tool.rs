use std::sync::Arc;

use crate::application::ChatClient;
use crate::domain::DomainError;

const SYSTEM_PROMPT: &str = "\
You are a helpful assistant. The user has asked a general question that does \
not require document knowledge, weather information, or mathematical \
calculations. Answer as accurately and helpfully as possible.";

/// Answers questions that fit no specialized category.
///
/// Also the fallback target when retrieval comes back empty.
pub struct GeneralTool {
    chat: Arc<dyn ChatClient>,
}

impl GeneralTool {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }

    pub async fn run(&self, question: &str) -> Result<String, DomainError> {
        self.chat.complete(SYSTEM_PROMPT, question).await
    }
}
