mod anthropic_client;
mod fs_document_source;
mod in_memory_index;
mod mock_chat;
mod mock_embedding;
mod openweather_client;
mod pinecone_index;
mod voyage_embedding;

pub use anthropic_client::*;
pub use fs_document_source::*;
pub use in_memory_index::*;
pub use mock_chat::*;
pub use mock_embedding::*;
pub use openweather_client::*;
pub use pinecone_index::*;
pub use voyage_embedding::*;
