//! Ports module for the change set services

pub mod inbound;
pub mod outbound;

pub use inbound::{ChangeSetApi, ChangeSetManagementApi};
pub use outbound::{ChangeSetDao, ChangeSetMemberDao, SystemTimeSource, TimeSource};
