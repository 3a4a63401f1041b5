use serde::{Deserialize, Serialize};

use super::QueryCategory;

/// The final answer returned to the caller.
///
/// Always carries non-empty text, even when every dependency failed; the
/// session identifier is an opaque pass-through the core never interprets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentAnswer {
    text: String,
    category: QueryCategory,
    used_fallback: bool,
    session_id: Option<String>,
}

impl AgentAnswer {
    pub fn new(text: impl Into<String>, category: QueryCategory) -> Self {
        Self {
            text: text.into(),
            category,
            used_fallback: false,
            session_id: None,
        }
    }

    pub fn with_fallback(mut self, used: bool) -> Self {
        self.used_fallback = used;
        self
    }

    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> QueryCategory {
        self.category
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}
