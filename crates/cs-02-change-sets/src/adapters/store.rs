//! In-memory change set store
//!
//! Implements both DAO ports over one lock, so membership uniqueness and the
//! open-group check are enforced atomically with the insert.

use crate::domain::{
    BusinessObjectGroupMember, BusinessObjectMetadata, ChangeSet, ChangeSetSearchCriteria,
    ChangeSetState,
};
use crate::error::DaoError;
use crate::ports::outbound::{ChangeSetDao, ChangeSetMemberDao};
use parking_lot::RwLock;
use shared_types::{BusinessObjectDescriptor, Metadata};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct StoreState {
    /// Change sets by guid, members cleared.
    change_sets: HashMap<String, ChangeSet>,
    /// Insertion order of change set guids.
    order: Vec<String>,
    /// Group id -> change set guid.
    groups: HashMap<String, String>,
    /// Group id -> members in insertion order.
    members: HashMap<String, Vec<BusinessObjectDescriptor>>,
    /// Descriptor -> group ids holding it, in insertion order.
    member_index: HashMap<BusinessObjectDescriptor, Vec<String>>,
    metadata: HashMap<(String, BusinessObjectDescriptor), Metadata>,
}

impl StoreState {
    fn group_state(&self, group_id: &str) -> Option<ChangeSetState> {
        self.groups
            .get(group_id)
            .and_then(|guid| self.change_sets.get(guid))
            .map(|cs| cs.state)
    }

    fn ordered(&self) -> impl Iterator<Item = &ChangeSet> {
        self.order.iter().filter_map(|guid| self.change_sets.get(guid))
    }
}

/// Thread-safe in-memory DAO implementation.
#[derive(Default)]
pub struct InMemoryChangeSetStore {
    state: RwLock<StoreState>,
}

impl InMemoryChangeSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored change sets.
    pub fn len(&self) -> usize {
        self.state.read().change_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().change_sets.is_empty()
    }

    /// Number of membership rows across all groups.
    pub fn member_count(&self) -> usize {
        self.state.read().members.values().map(Vec::len).sum()
    }
}

impl ChangeSetDao for InMemoryChangeSetStore {
    fn find_by_guid(&self, guid: &str) -> Result<Option<ChangeSet>, DaoError> {
        Ok(self.state.read().change_sets.get(guid).cloned())
    }

    fn find_by_object_group_id(&self, object_group_id: &str) -> Result<Option<ChangeSet>, DaoError> {
        let state = self.state.read();
        Ok(state
            .groups
            .get(object_group_id)
            .and_then(|guid| state.change_sets.get(guid))
            .cloned())
    }

    fn find_by_user(&self, user_guid: &str) -> Result<Vec<ChangeSet>, DaoError> {
        self.find_by_criteria(&ChangeSetSearchCriteria::new().for_user(user_guid))
    }

    fn find_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> Result<Vec<ChangeSet>, DaoError> {
        let state = self.state.read();
        Ok(state
            .ordered()
            .filter(|cs| criteria.matches(cs))
            .cloned()
            .collect())
    }

    fn count_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> Result<usize, DaoError> {
        let state = self.state.read();
        Ok(state.ordered().filter(|cs| criteria.matches(cs)).count())
    }

    fn find_all_guids(&self) -> Result<Vec<String>, DaoError> {
        Ok(self.state.read().order.clone())
    }

    fn find_by_object(
        &self,
        descriptor: &BusinessObjectDescriptor,
        states: &[ChangeSetState],
    ) -> Result<Vec<ChangeSet>, DaoError> {
        let state = self.state.read();
        let Some(group_ids) = state.member_index.get(descriptor) else {
            return Ok(Vec::new());
        };
        Ok(group_ids
            .iter()
            .filter_map(|group_id| state.groups.get(group_id))
            .filter_map(|guid| state.change_sets.get(guid))
            .filter(|cs| states.contains(&cs.state))
            .cloned()
            .collect())
    }

    fn add(&self, change_set: ChangeSet) -> Result<ChangeSet, DaoError> {
        let group_id = change_set
            .object_group_id()
            .ok_or_else(|| DaoError::Backend(format!("change set {} has no group id", change_set.guid)))?
            .to_string();

        let mut state = self.state.write();
        if state.change_sets.contains_key(&change_set.guid) {
            return Err(DaoError::Backend(format!(
                "change set {} already exists",
                change_set.guid
            )));
        }
        if state.groups.contains_key(&group_id) {
            return Err(DaoError::Backend(format!("group {group_id} already in use")));
        }

        let mut stored = change_set;
        stored.version = 1;
        stored.member_objects.clear();

        state.groups.insert(group_id.clone(), stored.guid.clone());
        state.members.insert(group_id, Vec::new());
        state.order.push(stored.guid.clone());
        state.change_sets.insert(stored.guid.clone(), stored.clone());
        Ok(stored)
    }

    fn update(&self, change_set: &ChangeSet) -> Result<ChangeSet, DaoError> {
        let mut state = self.state.write();
        let stored = state
            .change_sets
            .get_mut(&change_set.guid)
            .ok_or_else(|| DaoError::NotFound {
                key: change_set.guid.clone(),
            })?;

        if stored.version != change_set.version {
            return Err(DaoError::VersionConflict {
                guid: change_set.guid.clone(),
                expected: change_set.version,
                actual: stored.version,
            });
        }

        let mut updated = change_set.clone();
        updated.keep_creation_fields(stored);
        updated.version = stored.version + 1;
        updated.member_objects.clear();
        *stored = updated.clone();
        Ok(updated)
    }

    fn remove(&self, object_group_id: &str) -> Result<(), DaoError> {
        let mut state = self.state.write();
        let guid = state
            .groups
            .remove(object_group_id)
            .ok_or_else(|| DaoError::NotFound {
                key: object_group_id.to_string(),
            })?;

        state.change_sets.remove(&guid);
        state.order.retain(|g| *g != guid);
        let descriptors = state.members.remove(object_group_id).unwrap_or_default();
        for descriptor in descriptors {
            if let Some(groups) = state.member_index.get_mut(&descriptor) {
                groups.retain(|g| g != object_group_id);
                if groups.is_empty() {
                    state.member_index.remove(&descriptor);
                }
            }
        }
        state.metadata.retain(|(group_id, _), _| group_id != object_group_id);
        debug!(guid = %guid, object_group_id, "Change set removed");
        Ok(())
    }
}

impl ChangeSetMemberDao for InMemoryChangeSetStore {
    fn generate_group_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn find_group_members(&self, group_id: &str) -> Result<Vec<BusinessObjectGroupMember>, DaoError> {
        let state = self.state.read();
        Ok(state
            .members
            .get(group_id)
            .map(|descriptors| {
                descriptors
                    .iter()
                    .map(|d| BusinessObjectGroupMember::new(group_id, d.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn find_group_metadata(&self, group_id: &str) -> Result<Vec<BusinessObjectMetadata>, DaoError> {
        let state = self.state.read();
        let Some(descriptors) = state.members.get(group_id) else {
            return Ok(Vec::new());
        };
        let mut rows = Vec::new();
        for descriptor in descriptors {
            let key = (group_id.to_string(), descriptor.clone());
            for (k, v) in state.metadata.get(&key).into_iter().flatten() {
                rows.push(BusinessObjectMetadata {
                    group_id: group_id.to_string(),
                    descriptor: descriptor.clone(),
                    metadata_key: k.clone(),
                    metadata_value: v.clone(),
                });
            }
        }
        Ok(rows)
    }

    fn find_member_metadata(
        &self,
        group_id: &str,
        descriptor: &BusinessObjectDescriptor,
    ) -> Result<Metadata, DaoError> {
        Ok(self
            .state
            .read()
            .metadata
            .get(&(group_id.to_string(), descriptor.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn add_group_member(
        &self,
        member: BusinessObjectGroupMember,
        metadata: Metadata,
    ) -> Result<(), DaoError> {
        let mut state = self.state.write();

        match state.group_state(&member.group_id) {
            None => {
                return Err(DaoError::NotFound {
                    key: member.group_id,
                })
            }
            Some(s) if !s.is_mutable() => {
                return Err(DaoError::GroupNotOpen {
                    group_id: member.group_id,
                })
            }
            Some(_) => {}
        }

        let owner = state
            .member_index
            .get(&member.descriptor)
            .into_iter()
            .flatten()
            .find(|group_id| {
                state
                    .group_state(group_id)
                    .is_some_and(|s| !s.is_finalized())
            })
            .cloned();
        if let Some(owner_group_id) = owner {
            return Err(DaoError::DuplicateMembership {
                descriptor: member.descriptor,
                owner_group_id,
            });
        }

        state
            .member_index
            .entry(member.descriptor.clone())
            .or_default()
            .push(member.group_id.clone());
        state
            .members
            .entry(member.group_id.clone())
            .or_default()
            .push(member.descriptor.clone());
        if !metadata.is_empty() {
            state
                .metadata
                .insert((member.group_id, member.descriptor), metadata);
        }
        Ok(())
    }

    fn remove_group_member(
        &self,
        group_id: &str,
        descriptor: &BusinessObjectDescriptor,
    ) -> Result<bool, DaoError> {
        let mut state = self.state.write();
        let Some(members) = state.members.get_mut(group_id) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|d| d != descriptor);
        if members.len() == before {
            return Ok(false);
        }

        if let Some(groups) = state.member_index.get_mut(descriptor) {
            groups.retain(|g| g != group_id);
            if groups.is_empty() {
                state.member_index.remove(descriptor);
            }
        }
        state
            .metadata
            .remove(&(group_id.to_string(), descriptor.clone()));
        Ok(true)
    }

    fn put_member_metadata(
        &self,
        group_id: &str,
        descriptor: &BusinessObjectDescriptor,
        metadata: Metadata,
    ) -> Result<(), DaoError> {
        let mut state = self.state.write();
        let is_member = state
            .members
            .get(group_id)
            .is_some_and(|members| members.contains(descriptor));
        if !is_member {
            return Err(DaoError::NotFound {
                key: format!("{group_id}/{descriptor}"),
            });
        }
        state
            .metadata
            .entry((group_id.to_string(), descriptor.clone()))
            .or_default()
            .extend(metadata);
        Ok(())
    }
}
