//! # Change Set Container
//!
//! Central container holding the registries, the store, the bus and the
//! services, composed once with constructor injection.

pub mod config;
pub mod services;

pub use config::{ConfigError, RuntimeConfig};
pub use services::{ChangeSetContainer, ContainerError};
