//! Error types for the change set services
//!
//! Four classes of failure are kept apart:
//!
//! | Class | Variant | Recoverable |
//! |-------|---------|-------------|
//! | Validation | `InvalidArgument` | yes |
//! | Existence | `NotFound` | yes |
//! | Policy | `PolicyViolation`, `ConcurrentModification` | yes |
//! | Integration / system | `PublishFailed`, `Storage` | no |

use crate::domain::ChangeSetState;
use cs_01_object_resolution::QueryError;
use shared_bus::PublishError;
use shared_types::{BusinessObjectDescriptor, DescriptorError, ObjectKind};
use thiserror::Error;

/// Reasons an operation is refused by change set policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// The object already belongs to another active change set
    #[error("{descriptor} already belongs to change set {owner_guid}")]
    AlreadyClaimed {
        descriptor: BusinessObjectDescriptor,
        owner_guid: String,
    },

    /// The change set does not exist or is not open
    #[error("Change set {guid} does not accept changes")]
    ChangeNotAllowed { guid: String },

    /// The object could not be resolved to a descriptor
    #[error("Objects of kind {kind} cannot be resolved to a descriptor")]
    Unresolvable { kind: ObjectKind },

    /// The change set may not be removed
    #[error("Change set group {object_group_id} cannot be removed")]
    NotRemovable { object_group_id: String },

    /// The requested state change is not a forward move
    #[error("Cannot move change set from {from} to {to}")]
    InvalidTransition {
        from: ChangeSetState,
        to: ChangeSetState,
    },
}

/// Change set service errors
#[derive(Debug, Error)]
pub enum ChangeSetError {
    /// A required argument is missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No change set matches
    #[error("Change set not found: {key}")]
    NotFound { key: String },

    #[error("Policy violation: {0}")]
    PolicyViolation(#[from] PolicyViolation),

    /// Another caller updated the change set first
    #[error("Change set {guid} was modified concurrently (expected version {expected}, found {actual})")]
    ConcurrentModification {
        guid: String,
        expected: u64,
        actual: u64,
    },

    /// Event delivery failed; the triggering transition did not complete
    #[error("Publishing event for change set {guid} failed: {source}")]
    PublishFailed {
        guid: String,
        #[source]
        source: PublishError,
    },

    /// Persistence or lookup backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ChangeSetError {
    /// Whether the caller can act on this error (fix input, pick another
    /// change set, retry later) as opposed to a system failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ChangeSetError::PublishFailed { .. } | ChangeSetError::Storage(_)
        )
    }

    pub(crate) fn missing(what: &str) -> Self {
        ChangeSetError::InvalidArgument(format!("{what} is required"))
    }
}

impl From<DescriptorError> for ChangeSetError {
    fn from(err: DescriptorError) -> Self {
        ChangeSetError::InvalidArgument(err.to_string())
    }
}

impl From<QueryError> for ChangeSetError {
    fn from(err: QueryError) -> Self {
        ChangeSetError::Storage(err.to_string())
    }
}

impl From<DaoError> for ChangeSetError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound { key } => ChangeSetError::NotFound { key },
            DaoError::VersionConflict {
                guid,
                expected,
                actual,
            } => ChangeSetError::ConcurrentModification {
                guid,
                expected,
                actual,
            },
            // Carry group ids only; the membership service maps them to
            // change set guids before they reach a caller.
            err @ (DaoError::DuplicateMembership { .. } | DaoError::GroupNotOpen { .. }) => {
                ChangeSetError::Storage(err.to_string())
            }
            DaoError::Backend(reason) => ChangeSetError::Storage(reason),
        }
    }
}

/// Result type for change set operations
pub type ChangeSetResult<T> = Result<T, ChangeSetError>;

/// DAO boundary errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaoError {
    #[error("No record for {key}")]
    NotFound { key: String },

    /// The descriptor is already a member of a non-finalized group
    #[error("{descriptor} is already a member of group {owner_group_id}")]
    DuplicateMembership {
        descriptor: BusinessObjectDescriptor,
        owner_group_id: String,
    },

    /// The group's change set is not open for membership changes
    #[error("Group {group_id} is not open")]
    GroupNotOpen { group_id: String },

    /// Optimistic lock check failed
    #[error("Version conflict on {guid}: expected {expected}, found {actual}")]
    VersionConflict {
        guid: String,
        expected: u64,
        actual: u64,
    },

    #[error("Backend failure: {0}")]
    Backend(String),
}
