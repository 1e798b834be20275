//! # Integration Flows
//!
//! Every test builds its own container, so tests share no state.

#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod dependencies;
#[cfg(test)]
mod event_delivery;
#[cfg(test)]
mod lifecycle;

use std::sync::Arc;

use cs_01_object_resolution::InMemoryCatalog;
use cs_runtime::{seed_demo_catalog, ChangeSetContainer, RuntimeConfig};
use shared_types::BusinessObjectDescriptor;

/// Container over the demo catalog with `config`.
pub fn engine_with(config: RuntimeConfig) -> ChangeSetContainer {
    let catalog = Arc::new(InMemoryCatalog::new());
    seed_demo_catalog(&catalog);
    match ChangeSetContainer::with_catalog(config, catalog) {
        Ok(container) => container,
        Err(e) => panic!("demo container failed to build: {e}"),
    }
}

/// Container over the demo catalog with default configuration.
pub fn engine() -> ChangeSetContainer {
    engine_with(RuntimeConfig::default())
}

pub fn descriptor(object_type: &str, id: &str) -> BusinessObjectDescriptor {
    BusinessObjectDescriptor::new(object_type, id)
}
