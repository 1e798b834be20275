//! # Shared Types Crate
//!
//! This crate contains the catalog object model and the value types that name
//! those objects independently of their runtime shape.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Object kinds and their specialisation
//!   hierarchy are defined once, here.
//! - **Descriptors, not references**: Change sets store
//!   `BusinessObjectDescriptor` values (`type` + `identifier`), never live
//!   objects.
//! - **Deterministic collections**: Dependency sets keep insertion order and
//!   drop duplicates, so identical input always yields identical output.

pub mod descriptor;
pub mod entities;
pub mod errors;

pub use descriptor::{
    object_types, BusinessObjectDescriptor, DescriptorSet, Metadata, OBJECT_NAME_KEY,
};
pub use indexmap::IndexSet;
pub use entities::*;
pub use errors::DescriptorError;
