mod answer_question;
mod classify_query;
mod ingest_documents;
mod retrieve_context;
mod tools;

pub use answer_question::*;
pub use classify_query::*;
pub use ingest_documents::*;
pub use retrieve_context::*;
pub use tools::*;
