//! Driving Ports (API - Inbound)
//!
//! The operations UI and API layers call. Implemented by
//! `ChangeSetManagementService` and `ChangeSetService`.

use crate::domain::{
    AddOutcome, ChangeSet, ChangeSetLoadTuner, ChangeSetMember, ChangeSetObjectStatus,
    ChangeSetSearchCriteria, ChangeSetState, ObjectRef,
};
use crate::error::ChangeSetResult;
use shared_types::{BusinessObjectDescriptor, Metadata, ObjectKind};
use std::collections::HashMap;

/// Change set lifecycle API
pub trait ChangeSetManagementApi: Send + Sync {
    /// Persist a new open change set. Requires `created_by_user_guid`;
    /// stamps the creation date and allocates the object group id.
    fn add(&self, change_set: ChangeSet) -> ChangeSetResult<ChangeSet>;

    /// Remove the change set of `object_group_id` with its members.
    fn remove(&self, object_group_id: &str) -> ChangeSetResult<()>;

    /// Persist field changes, then reload members per `tuner`.
    ///
    /// The state is not writable here; use `update_state`. A finalized
    /// change set rejects every update.
    fn update(&self, change_set: ChangeSet, tuner: ChangeSetLoadTuner) -> ChangeSetResult<ChangeSet>;

    fn get(&self, guid: &str, tuner: ChangeSetLoadTuner) -> ChangeSetResult<Option<ChangeSet>>;

    /// Move a change set to `new_state`; entering `READY_TO_PUBLISH`
    /// publishes an event carrying the guid and `payload`.
    fn update_state(
        &self,
        guid: &str,
        new_state: ChangeSetState,
        payload: Option<&Metadata>,
    ) -> ChangeSetResult<ChangeSet>;

    fn find_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> ChangeSetResult<Vec<ChangeSet>>;

    fn count_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> ChangeSetResult<usize>;

    fn find_by_user(&self, user_guid: &str) -> ChangeSetResult<Vec<ChangeSet>>;

    fn find_all_guids(&self) -> ChangeSetResult<Vec<String>>;
}

/// Change set membership API
pub trait ChangeSetApi: Send + Sync {
    /// Add an object to change set `guid`.
    ///
    /// `resolve_metadata` overrides the configured default for resolving
    /// display metadata.
    fn add_object_to_change_set(
        &self,
        guid: &str,
        object: ObjectRef<'_>,
        metadata: Option<&Metadata>,
        resolve_metadata: Option<bool>,
    ) -> ChangeSetResult<AddOutcome>;

    /// Returns false if the object was not a member.
    fn remove_object_from_change_set(
        &self,
        guid: &str,
        descriptor: &BusinessObjectDescriptor,
    ) -> ChangeSetResult<bool>;

    fn get_status(&self, object: ObjectRef<'_>) -> ChangeSetResult<ChangeSetObjectStatus>;

    /// Non-finalized change sets holding the object.
    fn find_change_set(&self, object: ObjectRef<'_>) -> ChangeSetResult<Vec<ChangeSet>>;

    /// Owning non-finalized change set of each descriptor, leaving out
    /// `excluded`.
    fn find_change_sets_for(
        &self,
        descriptors: &[BusinessObjectDescriptor],
        excluded: Option<&str>,
    ) -> ChangeSetResult<HashMap<BusinessObjectDescriptor, ChangeSet>>;

    fn find_change_set_member_metadata(
        &self,
        guid: &str,
        object: ObjectRef<'_>,
    ) -> ChangeSetResult<Metadata>;

    /// Re-resolve and persist metadata for every member. Returns the number
    /// of members refreshed.
    fn update_resolved_metadata(&self, guid: &str) -> ChangeSetResult<usize>;

    fn find_members(&self, guid: &str) -> ChangeSetResult<Vec<ChangeSetMember>>;

    /// Dependencies of the object already held by a change set other than
    /// `guid`.
    fn find_conflicting_dependencies(
        &self,
        guid: &str,
        object: &BusinessObjectDescriptor,
        expected: ObjectKind,
    ) -> ChangeSetResult<HashMap<BusinessObjectDescriptor, ChangeSet>>;
}
