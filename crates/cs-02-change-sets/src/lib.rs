//! # CS-02: Change Sets
//!
//! Named, user-owned groupings of catalog objects that move together
//! through an editorial lifecycle before publication.
//!
//! ## Architecture
//!
//! - `domain/` - Change set entity, state machine, membership records
//! - `ports/` - Inbound APIs and outbound DAO/time traits
//! - `policy.rs` - Open-state checks, dependency and metadata resolution
//! - `service/` - Lifecycle management and membership services
//! - `adapters/` - In-memory store implementing both DAOs
//!
//! ## Lifecycle
//!
//! ```text
//! OPEN ──→ LOCKED ──→ READY_TO_PUBLISH ──→ FINALIZED
//!                           │
//!                           └──→ ChangeSetReadyForPublish event
//! ```
//!
//! Transitions only move forward. Only `OPEN` change sets accept adds and
//! removes. An object belongs to at most one non-finalized change set.
//!
//! ## Usage
//!
//! ```ignore
//! let management = ChangeSetManagementService::new(store.clone(), store.clone(), policy.clone(),
//!     factory, bus, Arc::new(SystemTimeSource));
//! let membership = ChangeSetService::new(store.clone(), store, policy, ChangeSetConfig::default());
//!
//! let cs = management.add(ChangeSet::new("", "Spring refresh").created_by("U1"))?;
//! membership.add_object_to_change_set(&cs.guid, (&product).into(), None, None)?;
//! management.update_state(&cs.guid, ChangeSetState::ReadyToPublish, None)?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod service;

pub use adapters::InMemoryChangeSetStore;
pub use config::ChangeSetConfig;
pub use domain::{
    AddOutcome, BusinessObjectGroupMember, BusinessObjectMetadata, ChangeSet, ChangeSetLoadTuner,
    ChangeSetMember, ChangeSetObjectStatus, ChangeSetSearchCriteria, ChangeSetState, ObjectRef,
    OwningChangeSet, StateTransition,
};
pub use error::{ChangeSetError, ChangeSetResult, DaoError, PolicyViolation};
pub use policy::ChangeSetPolicy;
pub use ports::{
    ChangeSetApi, ChangeSetDao, ChangeSetManagementApi, ChangeSetMemberDao, SystemTimeSource,
    TimeSource,
};
pub use service::{ChangeSetManagementService, ChangeSetService};
