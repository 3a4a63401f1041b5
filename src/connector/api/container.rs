use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    AnswerQuestionUseCase, ChatClient, DocumentSource, EmbeddingService, GeneralTool,
    IngestDocumentsUseCase, MathTool, QueryClassifier, RetrieveContextUseCase, VectorIndex,
    WeatherProvider, WeatherTool,
};
use crate::{
    AnthropicClient, FsDocumentSource, InMemoryIndex, MockChatClient, MockEmbedding,
    OpenWeatherClient, PineconeIndex, VoyageEmbedding, DEFAULT_TOP_K,
};

pub struct ContainerConfig {
    /// Directory holding the document corpus.
    pub data_dir: String,
    /// Fully offline: mock chat, mock embeddings, in-memory index.
    pub mock_mode: bool,
    /// In-memory index even with live model clients.
    pub memory_index: bool,
    /// Location substituted when a weather question names none.
    pub default_location: String,
    pub top_k: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            mock_mode: false,
            memory_index: false,
            default_location: crate::application::DEFAULT_LOCATION.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Explicit context object holding every initialized client.
///
/// Built once at process startup and passed down; use cases receive their
/// dependencies from here instead of reaching for process-wide mutable
/// state, so there is no racy lazy-singleton first use.
pub struct Container {
    chat: Arc<dyn ChatClient>,
    embedding_service: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    weather: Arc<dyn WeatherProvider>,
    source: Arc<dyn DocumentSource>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let chat: Arc<dyn ChatClient> = if config.mock_mode {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            Arc::new(AnthropicClient::from_env()?)
        };

        let embedding_service: Arc<dyn EmbeddingService> = if config.mock_mode {
            debug!("Using mock embedding service");
            Arc::new(MockEmbedding::new())
        } else {
            Arc::new(VoyageEmbedding::from_env()?)
        };

        let dimensions = embedding_service.config().dimensions();
        let index: Arc<dyn VectorIndex> = if config.mock_mode || config.memory_index {
            debug!("Using in-memory vector index ({dimensions} dims)");
            Arc::new(InMemoryIndex::new(dimensions))
        } else {
            Arc::new(PineconeIndex::from_env(dimensions)?)
        };

        let weather: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherClient::from_env());
        let source: Arc<dyn DocumentSource> = Arc::new(FsDocumentSource::new(&config.data_dir));

        Ok(Self {
            chat,
            embedding_service,
            index,
            weather,
            source,
            config,
        })
    }

    pub fn ingest_use_case(&self) -> IngestDocumentsUseCase {
        IngestDocumentsUseCase::new(
            Arc::clone(&self.source),
            Arc::clone(&self.embedding_service),
            Arc::clone(&self.index),
        )
    }

    pub fn answer_use_case(&self) -> AnswerQuestionUseCase {
        let classifier = QueryClassifier::new(Arc::clone(&self.chat));
        let retrieval = RetrieveContextUseCase::new(
            Arc::clone(&self.embedding_service),
            Arc::clone(&self.index),
        );
        let weather_tool = WeatherTool::new(Arc::clone(&self.chat), Arc::clone(&self.weather))
            .with_default_location(self.config.default_location.as_str());
        let math_tool = MathTool::new(Arc::clone(&self.chat));
        let general_tool = GeneralTool::new(Arc::clone(&self.chat));

        AnswerQuestionUseCase::new(
            classifier,
            retrieval,
            weather_tool,
            math_tool,
            general_tool,
            Arc::clone(&self.chat),
        )
        .with_top_k(self.config.top_k)
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }
}
