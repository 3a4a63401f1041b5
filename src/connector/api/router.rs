use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, IngestController, StatsController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    ingest_controller: IngestController<'a>,
    stats_controller: StatsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            ingest_controller: IngestController::new(container),
            stats_controller: StatsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ingest { force } => self.ingest_controller.ingest(force).await,
            Commands::Ask { question, session } => {
                self.ask_controller.ask(question, session).await
            }
            Commands::Stats => self.stats_controller.stats().await,
        }
    }
}
