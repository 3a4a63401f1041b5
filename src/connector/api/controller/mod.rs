mod ask_controller;
mod ingest_controller;
mod stats_controller;

pub use ask_controller::*;
pub use ingest_controller::*;
pub use stats_controller::*;
