//! Change set entity and state machine.

use super::member::ChangeSetMember;
use crate::error::{ChangeSetError, ChangeSetResult, PolicyViolation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_bus::EventType;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a change set.
///
/// ```text
/// OPEN ──→ LOCKED ──→ READY_TO_PUBLISH ──→ FINALIZED
///   │                       ↑                  ↑
///   └───────────────────────┴──────────────────┘   (forward skips allowed)
/// ```
///
/// Only `OPEN` accepts membership changes. `FINALIZED` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeSetState {
    Open,
    Locked,
    ReadyToPublish,
    Finalized,
}

impl ChangeSetState {
    /// States whose change sets are still in flight.
    pub const NON_FINALIZED: [ChangeSetState; 3] = [
        ChangeSetState::Open,
        ChangeSetState::Locked,
        ChangeSetState::ReadyToPublish,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ChangeSetState::Open => "OPEN",
            ChangeSetState::Locked => "LOCKED",
            ChangeSetState::ReadyToPublish => "READY_TO_PUBLISH",
            ChangeSetState::Finalized => "FINALIZED",
        }
    }

    /// The single state that accepts membership and metadata changes.
    pub fn is_mutable(self) -> bool {
        self == ChangeSetState::Open
    }

    pub fn is_finalized(self) -> bool {
        self == ChangeSetState::Finalized
    }

    /// Strictly forward moves only.
    pub fn can_transition_to(self, next: ChangeSetState) -> bool {
        next > self
    }

    /// Event published when a change set enters this state.
    pub fn entry_event(self) -> Option<EventType> {
        match self {
            ChangeSetState::ReadyToPublish => Some(EventType::ChangeSetReadyForPublish),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeSetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ChangeSetState {
    type Err = ChangeSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(ChangeSetState::Open),
            "LOCKED" => Ok(ChangeSetState::Locked),
            "READY_TO_PUBLISH" => Ok(ChangeSetState::ReadyToPublish),
            "FINALIZED" => Ok(ChangeSetState::Finalized),
            other => Err(ChangeSetError::InvalidArgument(format!(
                "unknown change set state '{other}'"
            ))),
        }
    }
}

/// Outcome of a validated state change.
///
/// The caller persists the new state and then delivers `pending_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ChangeSetState,
    pub to: ChangeSetState,
    pub pending_event: Option<EventType>,
}

/// A named group of edits promoted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub guid: String,
    /// Assigned once when the change set is created.
    object_group_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub state: ChangeSetState,
    pub created_by_user_guid: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    /// Optimistic lock counter, 0 until first persisted.
    pub version: u64,
    /// Rebuilt on read from group members and metadata; never persisted.
    #[serde(skip)]
    pub member_objects: Vec<ChangeSetMember>,
}

impl ChangeSet {
    /// A new, unsaved, open change set.
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            object_group_id: None,
            name: name.into(),
            description: None,
            state: ChangeSetState::Open,
            created_by_user_guid: None,
            created_date: None,
            version: 0,
            member_objects: Vec::new(),
        }
    }

    pub fn created_by(mut self, user_guid: impl Into<String>) -> Self {
        self.created_by_user_guid = Some(user_guid.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn object_group_id(&self) -> Option<&str> {
        self.object_group_id.as_deref()
    }

    /// Set the group id. Fails if one is already assigned.
    pub fn assign_object_group_id(&mut self, object_group_id: impl Into<String>) -> ChangeSetResult<()> {
        if let Some(existing) = &self.object_group_id {
            return Err(ChangeSetError::InvalidArgument(format!(
                "change set {} already has object group id {existing}",
                self.guid
            )));
        }
        self.object_group_id = Some(object_group_id.into());
        Ok(())
    }

    /// Group id of a persisted change set.
    pub fn require_object_group_id(&self) -> ChangeSetResult<&str> {
        self.object_group_id()
            .ok_or_else(|| ChangeSetError::Storage(format!("change set {} has no object group id", self.guid)))
    }

    /// Move to `to`, clearing the in-memory member list.
    ///
    /// Members are not reloaded on a pure state change.
    pub fn transition(&mut self, to: ChangeSetState) -> ChangeSetResult<StateTransition> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(PolicyViolation::InvalidTransition { from, to }.into());
        }
        self.state = to;
        self.member_objects.clear();
        Ok(StateTransition {
            from,
            to,
            pending_event: to.entry_event(),
        })
    }

    /// Carry over the fields fixed at creation from the stored record.
    pub(crate) fn keep_creation_fields(&mut self, stored: &ChangeSet) {
        self.object_group_id = stored.object_group_id.clone();
        self.created_by_user_guid = stored.created_by_user_guid.clone();
        self.created_date = stored.created_date;
    }

    /// Undo a persisted transition whose side effects failed.
    pub(crate) fn revert(&mut self, transition: &StateTransition) {
        self.state = transition.from;
    }
}
