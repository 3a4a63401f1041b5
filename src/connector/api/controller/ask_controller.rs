use anyhow::Result;
use uuid::Uuid;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, question: String, session: Option<String>) -> Result<String> {
        // Session ids are opaque to the core; mint one here when the caller
        // did not supply any, so follow-up turns can reference it.
        let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());

        let use_case = self.container.answer_use_case();
        let answer = use_case.execute(&question, Some(&session_id)).await?;

        let mut output = answer.text().to_string();
        output.push_str(&format!(
            "\n\n[category: {}{}, session: {}]",
            answer.category(),
            if answer.used_fallback() {
                ", via general fallback"
            } else {
                ""
            },
            answer.session_id().unwrap_or("-"),
        ));

        Ok(output)
    }
}
