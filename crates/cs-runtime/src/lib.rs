//! # Change Set Runtime Library
//!
//! Composition root for the change set engine. The `cs-runtime` binary
//! uses it to run a demo lifecycle; the integration tests use it to get a
//! fully wired engine.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: Ports define contracts, in-memory adapters
//!   implement them
//! - **Static composition**: Every registry is built once, here, and is
//!   read-only afterwards

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod demo;

pub use container::{ChangeSetContainer, ConfigError, ContainerError, RuntimeConfig};
pub use demo::seed_demo_catalog;
