//! Group membership records and the in-memory member join.

use super::change_set::ChangeSetState;
use serde::{Deserialize, Serialize};
use shared_types::{BusinessObjectDescriptor, CatalogObject, Metadata};
use std::collections::HashMap;

/// Persisted link between a change set group and a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessObjectGroupMember {
    pub group_id: String,
    pub descriptor: BusinessObjectDescriptor,
}

impl BusinessObjectGroupMember {
    pub fn new(group_id: impl Into<String>, descriptor: BusinessObjectDescriptor) -> Self {
        Self {
            group_id: group_id.into(),
            descriptor,
        }
    }
}

/// Persisted key/value annotation on a group member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessObjectMetadata {
    pub group_id: String,
    pub descriptor: BusinessObjectDescriptor,
    pub metadata_key: String,
    pub metadata_value: String,
}

/// A member as seen by callers: descriptor plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetMember {
    pub descriptor: BusinessObjectDescriptor,
    pub metadata: Metadata,
}

impl ChangeSetMember {
    pub fn new(descriptor: BusinessObjectDescriptor) -> Self {
        Self {
            descriptor,
            metadata: Metadata::new(),
        }
    }

    /// Display name, if resolved.
    pub fn object_name(&self) -> Option<&str> {
        self.metadata
            .get(shared_types::OBJECT_NAME_KEY)
            .map(String::as_str)
    }
}

/// Join group members with their metadata rows by descriptor.
///
/// Member order is kept; members without metadata stay in the result and
/// metadata rows without a member are dropped.
pub fn join_members(
    members: Vec<BusinessObjectGroupMember>,
    metadata: Vec<BusinessObjectMetadata>,
) -> Vec<ChangeSetMember> {
    let mut by_descriptor: HashMap<BusinessObjectDescriptor, Metadata> = HashMap::new();
    for row in metadata {
        by_descriptor
            .entry(row.descriptor)
            .or_default()
            .insert(row.metadata_key, row.metadata_value);
    }

    members
        .into_iter()
        .map(|member| {
            let metadata = by_descriptor.remove(&member.descriptor).unwrap_or_default();
            ChangeSetMember {
                descriptor: member.descriptor,
                metadata,
            }
        })
        .collect()
}

/// Either a live object or a descriptor naming one.
#[derive(Debug, Clone, Copy)]
pub enum ObjectRef<'a> {
    Live(&'a CatalogObject),
    Descriptor(&'a BusinessObjectDescriptor),
}

impl<'a> From<&'a CatalogObject> for ObjectRef<'a> {
    fn from(object: &'a CatalogObject) -> Self {
        ObjectRef::Live(object)
    }
}

impl<'a> From<&'a BusinessObjectDescriptor> for ObjectRef<'a> {
    fn from(descriptor: &'a BusinessObjectDescriptor) -> Self {
        ObjectRef::Descriptor(descriptor)
    }
}

/// Result of adding an object to a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new membership row was written.
    Added(ChangeSetMember),
    /// The object was already a member of this change set.
    AlreadyMember(BusinessObjectDescriptor),
}

impl AddOutcome {
    pub fn descriptor(&self) -> &BusinessObjectDescriptor {
        match self {
            AddOutcome::Added(member) => &member.descriptor,
            AddOutcome::AlreadyMember(descriptor) => descriptor,
        }
    }

    pub fn was_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// Change set currently owning an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwningChangeSet {
    pub guid: String,
    pub state: ChangeSetState,
}

/// Membership status of an object.
///
/// Never absent: an object no change set owns has an empty owner list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetObjectStatus {
    pub descriptor: Option<BusinessObjectDescriptor>,
    pub owners: Vec<OwningChangeSet>,
}

impl ChangeSetObjectStatus {
    pub fn change_set_guids(&self) -> Vec<&str> {
        self.owners.iter().map(|o| o.guid.as_str()).collect()
    }

    /// Owned by change set `guid`.
    pub fn is_member(&self, guid: &str) -> bool {
        self.owners.iter().any(|o| o.guid == guid)
    }

    /// Owned by a change set that no longer accepts changes.
    pub fn is_locked(&self) -> bool {
        self.owners.iter().any(|o| !o.state.is_mutable())
    }

    /// Change set `guid` could claim the object.
    pub fn is_available(&self, guid: &str) -> bool {
        self.owners.iter().all(|o| o.guid == guid)
    }
}
