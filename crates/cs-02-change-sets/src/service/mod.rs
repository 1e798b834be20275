//! Change set services - core business logic

pub mod management;
pub mod membership;

pub use management::ChangeSetManagementService;
pub use membership::ChangeSetService;
