mod answer;
mod chunk;
mod classification;
mod embedding;
mod index_record;
mod retrieval;
mod weather;

pub use answer::*;
pub use chunk::*;
pub use classification::*;
pub use embedding::*;
pub use index_record::*;
pub use retrieval::*;
pub use weather::*;
