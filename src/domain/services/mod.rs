mod error;
mod json_extract;

pub use error::*;
pub use json_extract::*;
