pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    route_for, AnswerQuestionUseCase, ChatClient, DocumentSource, EmbeddingService, GeneralTool,
    IngestConfig, IngestDocumentsUseCase, MathTool, QueryClassifier, RetrieveContextUseCase,
    RouteTarget, VectorIndex, WeatherProvider, WeatherTool, DEFAULT_TOP_K,
};

pub use cli::Commands;

pub use connector::{
    AnthropicClient, Container, ContainerConfig, FsDocumentSource, InMemoryIndex, MockChatClient,
    MockEmbedding, OpenWeatherClient, PineconeIndex, Router, VoyageEmbedding,
};

pub use domain::{
    AgentAnswer, Classification, CorpusLoad, DocumentChunk, DomainError, EmbeddingConfig,
    IndexMatch, IndexRecord, IngestReport, QueryCategory, RetrievedChunk, WeatherReading,
};
