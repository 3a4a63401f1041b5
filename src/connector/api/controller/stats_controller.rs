use anyhow::Result;

use crate::application::VectorIndex;

use super::super::Container;

pub struct StatsController<'a> {
    container: &'a Container,
}

impl<'a> StatsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn stats(&self) -> Result<String> {
        let index = self.container.index();
        index.ensure_ready().await?;
        let records = index.count().await?;

        Ok(format!(
            "RagPilot Statistics\n===================\nIndexed records: {}\nData Dir:        {}",
            records,
            self.container.data_dir()
        ))
    }
}
