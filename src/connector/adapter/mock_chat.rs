use async_trait::async_trait;

use crate::application::ChatClient;
use crate::domain::DomainError;

/// Offline [`ChatClient`] that echoes a canned response.
///
/// Deliberately returns prose with no JSON payload, so classification takes
/// its rag fallback and the whole pipeline exercises the degraded path
/// without any network access.
pub struct MockChatClient;

impl MockChatClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, DomainError> {
        let preview: String = user.chars().take(120).collect();
        Ok(format!("[mock response] {preview}"))
    }
}
