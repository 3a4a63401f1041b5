use std::sync::Arc;

use crate::application::ChatClient;
use crate::domain::DomainError;

const SYSTEM_PROMPT: &str = "\
You are a mathematical problem solver. Solve the user's problem step by step, \
showing your work clearly. If the query is not a well-formed math problem, \
interpret it as one and solve it to the best of your ability.";

/// Delegates math questions to the model in one step-by-step generation call.
/// No local arithmetic is performed.
pub struct MathTool {
    chat: Arc<dyn ChatClient>,
}

impl MathTool {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }

    pub async fn run(&self, question: &str) -> Result<String, DomainError> {
        self.chat.complete(SYSTEM_PROMPT, question).await
    }
}
