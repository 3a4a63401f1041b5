//! # Domain Layer
//!
//! Core models, the error taxonomy, and framework-free services.

pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
