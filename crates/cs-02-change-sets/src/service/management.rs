//! Change set lifecycle service

use crate::domain::{
    join_members, ChangeSet, ChangeSetLoadTuner, ChangeSetSearchCriteria, ChangeSetState,
};
use crate::error::{ChangeSetError, ChangeSetResult, PolicyViolation};
use crate::policy::ChangeSetPolicy;
use crate::ports::inbound::ChangeSetManagementApi;
use crate::ports::outbound::{ChangeSetDao, ChangeSetMemberDao, TimeSource};
use shared_bus::{EventFactory, EventPublisher};
use shared_types::Metadata;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Owns the change set entity lifecycle and its state machine.
///
/// `update_state` runs validate → persist → publish. A publish failure
/// restores the previous state and surfaces `PublishFailed`.
pub struct ChangeSetManagementService {
    change_sets: Arc<dyn ChangeSetDao>,
    members: Arc<dyn ChangeSetMemberDao>,
    policy: Arc<ChangeSetPolicy>,
    event_factory: Arc<dyn EventFactory>,
    publisher: Arc<dyn EventPublisher>,
    time_source: Arc<dyn TimeSource>,
}

impl ChangeSetManagementService {
    pub fn new(
        change_sets: Arc<dyn ChangeSetDao>,
        members: Arc<dyn ChangeSetMemberDao>,
        policy: Arc<ChangeSetPolicy>,
        event_factory: Arc<dyn EventFactory>,
        publisher: Arc<dyn EventPublisher>,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            change_sets,
            members,
            policy,
            event_factory,
            publisher,
            time_source,
        }
    }

    /// Rebuild `member_objects` from the two persisted tables.
    pub(crate) fn load_members(
        members: &dyn ChangeSetMemberDao,
        change_set: &mut ChangeSet,
        tuner: ChangeSetLoadTuner,
    ) -> ChangeSetResult<()> {
        change_set.member_objects.clear();
        if !tuner.load_member_objects {
            return Ok(());
        }
        let group_id = change_set.require_object_group_id()?;
        let rows = members.find_group_members(group_id)?;
        let metadata = if tuner.load_metadata {
            members.find_group_metadata(group_id)?
        } else {
            Vec::new()
        };
        change_set.member_objects = join_members(rows, metadata);
        Ok(())
    }

    fn require(&self, guid: &str) -> ChangeSetResult<ChangeSet> {
        self.change_sets
            .find_by_guid(guid)?
            .ok_or_else(|| ChangeSetError::NotFound {
                key: guid.to_string(),
            })
    }
}

impl ChangeSetManagementApi for ChangeSetManagementService {
    fn add(&self, mut change_set: ChangeSet) -> ChangeSetResult<ChangeSet> {
        let has_user = change_set
            .created_by_user_guid
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        if !has_user {
            return Err(ChangeSetError::missing("created_by_user_guid"));
        }
        if change_set.object_group_id().is_some() {
            return Err(ChangeSetError::InvalidArgument(
                "object group id is assigned on creation".to_string(),
            ));
        }
        if change_set.guid.trim().is_empty() {
            change_set.guid = Uuid::new_v4().to_string();
        }

        change_set.state = ChangeSetState::Open;
        change_set.created_date = Some(self.time_source.now());
        change_set.assign_object_group_id(self.members.generate_group_id())?;

        let saved = self.change_sets.add(change_set)?;
        info!(
            guid = %saved.guid,
            object_group_id = saved.object_group_id().unwrap_or_default(),
            user = saved.created_by_user_guid.as_deref().unwrap_or_default(),
            "Change set created"
        );
        Ok(saved)
    }

    fn remove(&self, object_group_id: &str) -> ChangeSetResult<()> {
        if object_group_id.trim().is_empty() {
            return Err(ChangeSetError::missing("object_group_id"));
        }
        if !self.policy.can_remove(object_group_id) {
            return Err(PolicyViolation::NotRemovable {
                object_group_id: object_group_id.to_string(),
            }
            .into());
        }
        self.change_sets.remove(object_group_id)?;
        info!(object_group_id, "Change set removed");
        Ok(())
    }

    fn update(&self, change_set: ChangeSet, tuner: ChangeSetLoadTuner) -> ChangeSetResult<ChangeSet> {
        if change_set.guid.trim().is_empty() {
            return Err(ChangeSetError::missing("guid"));
        }
        let stored = self.require(&change_set.guid)?;
        if stored.state == ChangeSetState::Finalized {
            return Err(PolicyViolation::ChangeNotAllowed {
                guid: change_set.guid,
            }
            .into());
        }
        if change_set.state != stored.state {
            return Err(ChangeSetError::InvalidArgument(format!(
                "state of {} changes through update_state, not update",
                change_set.guid
            )));
        }
        let mut saved = self.change_sets.update(&change_set)?;
        Self::load_members(self.members.as_ref(), &mut saved, tuner)?;
        Ok(saved)
    }

    fn get(&self, guid: &str, tuner: ChangeSetLoadTuner) -> ChangeSetResult<Option<ChangeSet>> {
        let Some(mut change_set) = self.change_sets.find_by_guid(guid)? else {
            return Ok(None);
        };
        Self::load_members(self.members.as_ref(), &mut change_set, tuner)?;
        Ok(Some(change_set))
    }

    fn update_state(
        &self,
        guid: &str,
        new_state: ChangeSetState,
        payload: Option<&Metadata>,
    ) -> ChangeSetResult<ChangeSet> {
        if guid.trim().is_empty() {
            return Err(ChangeSetError::missing("guid"));
        }

        let mut change_set = self.require(guid)?;
        let transition = change_set.transition(new_state)?;
        let saved = self.change_sets.update(&change_set)?;
        info!(guid, from = %transition.from, to = %transition.to, "Change set state changed");

        let Some(event_type) = transition.pending_event else {
            return Ok(saved);
        };

        let event = self.event_factory.create_event(event_type, guid, payload);
        match self.publisher.publish(event) {
            Ok(receivers) => {
                info!(guid, event_type = event_type.as_str(), receivers, "Event published");
                Ok(saved)
            }
            Err(source) => {
                error!(guid, error = %source, "Event publish failed, restoring previous state");
                let mut restored = saved;
                restored.revert(&transition);
                if let Err(e) = self.change_sets.update(&restored) {
                    warn!(guid, error = %e, "Could not restore state after publish failure");
                }
                Err(ChangeSetError::PublishFailed {
                    guid: guid.to_string(),
                    source,
                })
            }
        }
    }

    fn find_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> ChangeSetResult<Vec<ChangeSet>> {
        Ok(self.change_sets.find_by_criteria(criteria)?)
    }

    fn count_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> ChangeSetResult<usize> {
        Ok(self.change_sets.count_by_criteria(criteria)?)
    }

    fn find_by_user(&self, user_guid: &str) -> ChangeSetResult<Vec<ChangeSet>> {
        if user_guid.trim().is_empty() {
            return Err(ChangeSetError::missing("user_guid"));
        }
        Ok(self.change_sets.find_by_user(user_guid)?)
    }

    fn find_all_guids(&self) -> ChangeSetResult<Vec<String>> {
        Ok(self.change_sets.find_all_guids()?)
    }
}
