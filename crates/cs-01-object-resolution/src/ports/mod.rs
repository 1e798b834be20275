//! Ports module for Business Object Resolution
//!
//! Only outbound (SPI) ports live here; the inbound API is the
//! `BusinessObjectResolver` service itself.

pub mod outbound;

pub use outbound::{CatalogLookup, NamedQueryService, QueryError, QueryRow};
