//! Change set membership service

use super::management::ChangeSetManagementService;
use crate::config::ChangeSetConfig;
use crate::domain::{
    AddOutcome, BusinessObjectGroupMember, ChangeSet, ChangeSetLoadTuner, ChangeSetMember,
    ChangeSetObjectStatus, ChangeSetState, ObjectRef, OwningChangeSet,
};
use crate::error::{ChangeSetError, ChangeSetResult, DaoError, PolicyViolation};
use crate::policy::ChangeSetPolicy;
use crate::ports::inbound::ChangeSetApi;
use crate::ports::outbound::{ChangeSetDao, ChangeSetMemberDao};
use shared_types::{BusinessObjectDescriptor, Metadata, ObjectKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Object-to-change-set membership operations.
///
/// The uniqueness rule (one active change set per object) is checked here
/// for a precise error, and enforced atomically by
/// `ChangeSetMemberDao::add_group_member`.
pub struct ChangeSetService {
    change_sets: Arc<dyn ChangeSetDao>,
    members: Arc<dyn ChangeSetMemberDao>,
    policy: Arc<ChangeSetPolicy>,
    config: ChangeSetConfig,
}

impl ChangeSetService {
    pub fn new(
        change_sets: Arc<dyn ChangeSetDao>,
        members: Arc<dyn ChangeSetMemberDao>,
        policy: Arc<ChangeSetPolicy>,
        config: ChangeSetConfig,
    ) -> Self {
        Self {
            change_sets,
            members,
            policy,
            config,
        }
    }

    pub fn policy(&self) -> &ChangeSetPolicy {
        &self.policy
    }

    /// Descriptor of a mutation target. Unresolvable live objects are a
    /// policy violation.
    fn require_descriptor(&self, object: ObjectRef<'_>) -> ChangeSetResult<BusinessObjectDescriptor> {
        match object {
            ObjectRef::Descriptor(descriptor) => {
                descriptor.validate()?;
                Ok(descriptor.clone())
            }
            ObjectRef::Live(live) => self.policy.resolve_object_descriptor(live).ok_or_else(|| {
                PolicyViolation::Unresolvable { kind: live.kind() }.into()
            }),
        }
    }

    /// Descriptor for read paths: `None` instead of an error.
    fn lookup_descriptor(&self, object: ObjectRef<'_>) -> Option<BusinessObjectDescriptor> {
        match object {
            ObjectRef::Descriptor(descriptor) => descriptor.validate().ok().map(|_| descriptor.clone()),
            ObjectRef::Live(live) => self.policy.resolve_object_descriptor(live),
        }
    }

    fn require_guid(guid: &str) -> ChangeSetResult<()> {
        if guid.trim().is_empty() {
            return Err(ChangeSetError::missing("change set guid"));
        }
        Ok(())
    }

    fn require_change_set(&self, guid: &str) -> ChangeSetResult<ChangeSet> {
        self.change_sets
            .find_by_guid(guid)?
            .ok_or_else(|| ChangeSetError::NotFound {
                key: guid.to_string(),
            })
    }

    fn require_open(&self, guid: &str) -> ChangeSetResult<ChangeSet> {
        if !self.policy.is_change_allowed(guid) {
            return Err(PolicyViolation::ChangeNotAllowed {
                guid: guid.to_string(),
            }
            .into());
        }
        self.require_change_set(guid)
    }

    fn in_flight(&self, descriptor: &BusinessObjectDescriptor) -> ChangeSetResult<Vec<ChangeSet>> {
        Ok(self
            .change_sets
            .find_by_object(descriptor, &ChangeSetState::NON_FINALIZED)?)
    }

    /// Translate a store-level duplicate into the outcome callers see.
    fn duplicate_outcome(
        &self,
        change_set: &ChangeSet,
        descriptor: BusinessObjectDescriptor,
        owner_group_id: &str,
    ) -> ChangeSetResult<AddOutcome> {
        if change_set.object_group_id() == Some(owner_group_id) {
            return Ok(AddOutcome::AlreadyMember(descriptor));
        }
        let owner_guid = self
            .change_sets
            .find_by_object_group_id(owner_group_id)?
            .map(|cs| cs.guid)
            .unwrap_or_else(|| owner_group_id.to_string());
        Err(PolicyViolation::AlreadyClaimed {
            descriptor,
            owner_guid,
        }
        .into())
    }
}

impl ChangeSetApi for ChangeSetService {
    fn add_object_to_change_set(
        &self,
        guid: &str,
        object: ObjectRef<'_>,
        metadata: Option<&Metadata>,
        resolve_metadata: Option<bool>,
    ) -> ChangeSetResult<AddOutcome> {
        Self::require_guid(guid)?;
        let descriptor = self.require_descriptor(object)?;
        let change_set = self.require_open(guid)?;

        let owners = self.policy.get_object_membership_guids(&descriptor)?;
        if owners.iter().any(|owner| owner == guid) {
            debug!(guid, descriptor = %descriptor, "Object already in change set");
            return Ok(AddOutcome::AlreadyMember(descriptor));
        }
        if let Some(owner_guid) = owners.into_iter().next() {
            return Err(PolicyViolation::AlreadyClaimed {
                descriptor,
                owner_guid,
            }
            .into());
        }

        let mut member_metadata = Metadata::new();
        if resolve_metadata.unwrap_or(self.config.resolve_metadata_on_add) {
            member_metadata.extend(self.policy.resolve_meta_data(&descriptor)?);
        }
        if let Some(supplied) = metadata {
            member_metadata.extend(supplied.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let group_id = change_set.require_object_group_id()?;
        let member = BusinessObjectGroupMember::new(group_id, descriptor.clone());
        match self.members.add_group_member(member, member_metadata.clone()) {
            Ok(()) => {
                info!(guid, descriptor = %descriptor, "Object added to change set");
                Ok(AddOutcome::Added(ChangeSetMember {
                    descriptor,
                    metadata: member_metadata,
                }))
            }
            Err(DaoError::DuplicateMembership {
                descriptor,
                owner_group_id,
            }) => self.duplicate_outcome(&change_set, descriptor, &owner_group_id),
            Err(DaoError::GroupNotOpen { .. }) => Err(PolicyViolation::ChangeNotAllowed {
                guid: guid.to_string(),
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    fn remove_object_from_change_set(
        &self,
        guid: &str,
        descriptor: &BusinessObjectDescriptor,
    ) -> ChangeSetResult<bool> {
        Self::require_guid(guid)?;
        descriptor.validate()?;
        let change_set = self.require_open(guid)?;
        let removed = self
            .members
            .remove_group_member(change_set.require_object_group_id()?, descriptor)?;
        if removed {
            info!(guid, descriptor = %descriptor, "Object removed from change set");
        }
        Ok(removed)
    }

    fn get_status(&self, object: ObjectRef<'_>) -> ChangeSetResult<ChangeSetObjectStatus> {
        let Some(descriptor) = self.lookup_descriptor(object) else {
            return Ok(ChangeSetObjectStatus::default());
        };
        let owners = self
            .in_flight(&descriptor)?
            .into_iter()
            .map(|cs| OwningChangeSet {
                guid: cs.guid,
                state: cs.state,
            })
            .collect();
        Ok(ChangeSetObjectStatus {
            descriptor: Some(descriptor),
            owners,
        })
    }

    fn find_change_set(&self, object: ObjectRef<'_>) -> ChangeSetResult<Vec<ChangeSet>> {
        match self.lookup_descriptor(object) {
            Some(descriptor) => self.in_flight(&descriptor),
            None => Ok(Vec::new()),
        }
    }

    fn find_change_sets_for(
        &self,
        descriptors: &[BusinessObjectDescriptor],
        excluded: Option<&str>,
    ) -> ChangeSetResult<HashMap<BusinessObjectDescriptor, ChangeSet>> {
        let mut owners = HashMap::new();
        for descriptor in descriptors {
            let owner = self
                .in_flight(descriptor)?
                .into_iter()
                .find(|cs| Some(cs.guid.as_str()) != excluded);
            if let Some(owner) = owner {
                owners.insert(descriptor.clone(), owner);
            }
        }
        Ok(owners)
    }

    fn find_change_set_member_metadata(
        &self,
        guid: &str,
        object: ObjectRef<'_>,
    ) -> ChangeSetResult<Metadata> {
        Self::require_guid(guid)?;
        let Some(descriptor) = self.lookup_descriptor(object) else {
            return Ok(Metadata::new());
        };
        let Some(change_set) = self.change_sets.find_by_guid(guid)? else {
            return Ok(Metadata::new());
        };
        Ok(self
            .members
            .find_member_metadata(change_set.require_object_group_id()?, &descriptor)?)
    }

    fn update_resolved_metadata(&self, guid: &str) -> ChangeSetResult<usize> {
        Self::require_guid(guid)?;
        let change_set = self.require_change_set(guid)?;
        if change_set.state.is_finalized() {
            return Err(PolicyViolation::ChangeNotAllowed {
                guid: guid.to_string(),
            }
            .into());
        }

        let group_id = change_set.require_object_group_id()?;
        let members = self.members.find_group_members(group_id)?;
        let mut refreshed = 0;
        for member in &members {
            let metadata = self.policy.resolve_meta_data(&member.descriptor)?;
            if metadata.is_empty() {
                continue;
            }
            self.members
                .put_member_metadata(group_id, &member.descriptor, metadata)?;
            refreshed += 1;
        }
        info!(guid, members = members.len(), refreshed, "Member metadata refreshed");
        Ok(refreshed)
    }

    fn find_members(&self, guid: &str) -> ChangeSetResult<Vec<ChangeSetMember>> {
        Self::require_guid(guid)?;
        let mut change_set = self.require_change_set(guid)?;
        ChangeSetManagementService::load_members(
            self.members.as_ref(),
            &mut change_set,
            ChangeSetLoadTuner::all(),
        )?;
        Ok(change_set.member_objects)
    }

    fn find_conflicting_dependencies(
        &self,
        guid: &str,
        object: &BusinessObjectDescriptor,
        expected: ObjectKind,
    ) -> ChangeSetResult<HashMap<BusinessObjectDescriptor, ChangeSet>> {
        Self::require_guid(guid)?;
        object.validate()?;
        let dependencies: Vec<_> = self
            .policy
            .get_dependent_objects(object, expected)
            .into_iter()
            .collect();
        self.find_change_sets_for(&dependencies, Some(guid))
    }
}
