//! # Connector Layer
//!
//! Adapters implementing the application ports (HTTP clients, the in-memory
//! index, mocks, the filesystem document source) and the wiring layer that
//! assembles them into a runnable system.

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::{Container, ContainerConfig, Router};
