//! Error types for Business Object Resolution

use shared_types::ObjectKind;
use thiserror::Error;

/// Registry construction errors
///
/// Registries are validated once, when they are built; lookups never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two registrations share one object type string
    #[error("Object type '{object_type}' is registered more than once")]
    DuplicateObjectType { object_type: String },

    /// A kind was registered twice
    #[error("Kind {kind} is registered more than once")]
    DuplicateKind { kind: ObjectKind },

    /// A subtype is not ranked above its supertype
    #[error("Rank inversion: {subtype} (rank {subtype_rank}) must rank above {supertype} (rank {supertype_rank})")]
    RankInversion {
        subtype: ObjectKind,
        subtype_rank: u8,
        supertype: ObjectKind,
        supertype_rank: u8,
    },

    /// Only transfer objects may be registered in the exact-match table
    #[error("Kind {kind} carries a guid and cannot be registered as a transfer object")]
    NotATransferObject { kind: ObjectKind },
}

/// Result type for registry construction
pub type RegistryResult<T> = Result<T, RegistryError>;
