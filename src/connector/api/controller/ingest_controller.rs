use anyhow::Result;

use super::super::Container;

pub struct IngestController<'a> {
    container: &'a Container,
}

impl<'a> IngestController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ingest(&self, force: bool) -> Result<String> {
        let use_case = self.container.ingest_use_case();
        let report = use_case.execute(force).await?;

        Ok(format!(
            "Ingestion complete: {} documents split into {} chunks.",
            report.documents, report.chunks
        ))
    }
}
