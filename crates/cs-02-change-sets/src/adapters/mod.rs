//! Adapters (outbound port implementations)

pub mod store;

pub use store::InMemoryChangeSetStore;
