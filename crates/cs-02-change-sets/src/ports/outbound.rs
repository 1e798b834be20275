//! Outbound Ports (Driven Ports / SPI)
//!
//! The DAO boundary and the clock. Implementations must make
//! `ChangeSetMemberDao::add_group_member` atomic: the check that no other
//! non-finalized group holds the descriptor and the insert happen as one
//! step (a uniqueness constraint or a serializable transaction).

use crate::domain::{
    BusinessObjectGroupMember, BusinessObjectMetadata, ChangeSet, ChangeSetSearchCriteria,
    ChangeSetState,
};
use crate::error::DaoError;
use chrono::{DateTime, Utc};
use shared_types::{BusinessObjectDescriptor, Metadata};

/// Change set persistence
pub trait ChangeSetDao: Send + Sync {
    fn find_by_guid(&self, guid: &str) -> Result<Option<ChangeSet>, DaoError>;

    fn find_by_object_group_id(&self, object_group_id: &str) -> Result<Option<ChangeSet>, DaoError>;

    fn find_by_user(&self, user_guid: &str) -> Result<Vec<ChangeSet>, DaoError>;

    fn find_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> Result<Vec<ChangeSet>, DaoError>;

    fn count_by_criteria(&self, criteria: &ChangeSetSearchCriteria) -> Result<usize, DaoError>;

    fn find_all_guids(&self) -> Result<Vec<String>, DaoError>;

    /// Change sets in one of `states` holding `descriptor`, in the order the
    /// memberships were created.
    fn find_by_object(
        &self,
        descriptor: &BusinessObjectDescriptor,
        states: &[ChangeSetState],
    ) -> Result<Vec<ChangeSet>, DaoError>;

    /// Insert a new change set; the stored copy has version 1.
    fn add(&self, change_set: ChangeSet) -> Result<ChangeSet, DaoError>;

    /// Write `change_set` if its version matches the stored one, bumping the
    /// version. Group id and creation fields are never overwritten.
    fn update(&self, change_set: &ChangeSet) -> Result<ChangeSet, DaoError>;

    /// Delete the change set of `object_group_id` with its members and
    /// metadata.
    fn remove(&self, object_group_id: &str) -> Result<(), DaoError>;
}

/// Group member and metadata persistence
pub trait ChangeSetMemberDao: Send + Sync {
    /// Fresh group id, independent of any change set guid.
    fn generate_group_id(&self) -> String;

    fn find_group_members(&self, group_id: &str) -> Result<Vec<BusinessObjectGroupMember>, DaoError>;

    fn find_group_metadata(&self, group_id: &str) -> Result<Vec<BusinessObjectMetadata>, DaoError>;

    fn find_member_metadata(
        &self,
        group_id: &str,
        descriptor: &BusinessObjectDescriptor,
    ) -> Result<Metadata, DaoError>;

    /// Insert a member with its metadata.
    ///
    /// Fails with `DuplicateMembership` when any non-finalized group
    /// (this one included) already holds the descriptor, and with
    /// `GroupNotOpen` unless the group's change set is open.
    fn add_group_member(
        &self,
        member: BusinessObjectGroupMember,
        metadata: Metadata,
    ) -> Result<(), DaoError>;

    /// Delete a member and its metadata. Returns false if it was absent.
    fn remove_group_member(
        &self,
        group_id: &str,
        descriptor: &BusinessObjectDescriptor,
    ) -> Result<bool, DaoError>;

    /// Insert or overwrite metadata keys of an existing member.
    fn put_member_metadata(
        &self,
        group_id: &str,
        descriptor: &BusinessObjectDescriptor,
        metadata: Metadata,
    ) -> Result<(), DaoError>;
}

/// Time source for creation timestamps.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
