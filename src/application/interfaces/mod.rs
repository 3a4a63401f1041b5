mod chat_client;
mod document_source;
mod embedding_service;
mod vector_index;
mod weather_provider;

pub use chat_client::*;
pub use document_source::*;
pub use embedding_service::*;
pub use vector_index::*;
pub use weather_provider::*;
