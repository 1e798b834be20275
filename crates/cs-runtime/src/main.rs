//! # Change Set Runtime
//!
//! Walks one change set through its lifecycle against the demo catalog:
//!
//! 1. Load configuration (env)
//! 2. Initialize logging
//! 3. Build the container and seed the catalog
//! 4. Create a change set, add a product, report its dependencies
//! 5. Lock, mark ready to publish, print the emitted event

use std::sync::Arc;

use anyhow::{Context, Result};
use cs_01_object_resolution::InMemoryCatalog;
use cs_02_change_sets::{ChangeSet, ChangeSetApi, ChangeSetManagementApi, ChangeSetState};
use cs_runtime::{seed_demo_catalog, ChangeSetContainer, RuntimeConfig};
use cs_telemetry::{init_telemetry, log_change_set_event, log_event};
use shared_bus::EventFilter;
use shared_types::{object_types, BusinessObjectDescriptor, ObjectKind};

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("loading configuration")?;
    let _telemetry = init_telemetry(&config.telemetry).context("initializing logging")?;

    let catalog = Arc::new(InMemoryCatalog::new());
    seed_demo_catalog(&catalog);
    let container = ChangeSetContainer::with_catalog(config, catalog)
        .context("building change set container")?;
    let mut subscription = container.subscribe(EventFilter::all());

    let change_set = container
        .management
        .add(
            ChangeSet::new("", "Spring refresh")
                .created_by("demo-user")
                .with_description("Demo lifecycle"),
        )
        .context("creating change set")?;
    let guid = change_set.guid.clone();
    log_change_set_event!(info, "runtime", "Change set created", guid);

    let product = BusinessObjectDescriptor::new(object_types::PRODUCT, "P1");
    container
        .membership
        .add_object_to_change_set(&guid, (&product).into(), None, Some(true))
        .context("adding product")?;

    let dependencies = container
        .policy
        .get_dependent_objects(&product, ObjectKind::Product);
    for dependency in &dependencies {
        log_event!(
            info,
            "runtime",
            "Dependency",
            object_type = %dependency.object_type,
            object_identifier = %dependency.object_identifier
        );
    }

    container
        .management
        .update_state(&guid, ChangeSetState::Locked, None)
        .context("locking change set")?;
    container
        .management
        .update_state(&guid, ChangeSetState::ReadyToPublish, None)
        .context("marking change set ready to publish")?;

    for event in subscription.drain() {
        log_change_set_event!(
            info,
            "runtime",
            "Event received",
            event.guid,
            event_type = event.event_type.as_str()
        );
    }

    let members = container.membership.find_members(&guid)?;
    log_change_set_event!(
        info,
        "runtime",
        "Lifecycle complete",
        guid,
        members = members.len(),
        dependencies = dependencies.len()
    );
    Ok(())
}
