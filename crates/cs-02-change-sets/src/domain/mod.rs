//! Domain module for change sets
//!
//! The change set entity, its state machine and the membership records.

pub mod change_set;
pub mod member;
pub mod search;

pub use change_set::{ChangeSet, ChangeSetState, StateTransition};
pub use member::{
    join_members, AddOutcome, BusinessObjectGroupMember, BusinessObjectMetadata, ChangeSetMember,
    ChangeSetObjectStatus, ObjectRef, OwningChangeSet,
};
pub use search::{ChangeSetLoadTuner, ChangeSetSearchCriteria};
