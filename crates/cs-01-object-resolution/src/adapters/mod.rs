//! Adapters (outbound port implementations)

pub mod catalog;

pub use catalog::InMemoryCatalog;
