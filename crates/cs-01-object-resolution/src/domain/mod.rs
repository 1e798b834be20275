//! Domain module for Business Object Resolution
//!
//! Contains the resolver strategies and the registries that select them.

pub mod dependency;
pub mod guid;
pub mod metadata;
pub mod registry;
