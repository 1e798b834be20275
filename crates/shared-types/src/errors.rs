//! # Error Types
//!
//! Defines error types shared across crates.

use thiserror::Error;

/// A descriptor that cannot name an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The object type part is empty.
    #[error("Descriptor has no object type")]
    MissingType,

    /// The identifier part is empty.
    #[error("Descriptor of type '{object_type}' has no object identifier")]
    MissingIdentifier { object_type: String },
}
