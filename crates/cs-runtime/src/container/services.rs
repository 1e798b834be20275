//! # Service Container
//!
//! ## Initialization Order
//!
//! ```text
//! Phase 1: Adapters       catalog, change set store, event bus
//! Phase 2: Registries     types, guid, dependency, metadata resolvers
//! Phase 3: Policy         resolver + registries + change set DAO
//! Phase 4: Services       management (publishes), membership
//! ```
//!
//! Every registry is read-only after Phase 2; the container hands out
//! `Arc`s so services can be shared across threads.

use std::sync::Arc;

use cs_01_object_resolution::{
    BusinessObjectResolver, DependencyResolverRegistry, GuidResolverRegistry, InMemoryCatalog,
    MetadataResolverRegistry, RegistryError, TypeRegistry,
};
use cs_02_change_sets::{
    ChangeSetManagementService, ChangeSetPolicy, ChangeSetService, InMemoryChangeSetStore,
    SystemTimeSource,
};
use shared_bus::{DefaultEventFactory, EventFilter, InMemoryEventBus, Subscription};
use thiserror::Error;
use tracing::{info, instrument};

use crate::container::config::{ConfigError, RuntimeConfig};

/// Container construction errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid type registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Fully wired change set engine.
pub struct ChangeSetContainer {
    // =========================================================================
    // ADAPTERS
    // =========================================================================
    /// Catalog backing both `CatalogLookup` and `NamedQueryService`.
    pub catalog: Arc<InMemoryCatalog>,

    /// Store backing both change set DAOs.
    pub store: Arc<InMemoryChangeSetStore>,

    /// Lifecycle event bus.
    pub event_bus: Arc<InMemoryEventBus>,

    // =========================================================================
    // SERVICES
    // =========================================================================
    pub resolver: Arc<BusinessObjectResolver>,

    pub policy: Arc<ChangeSetPolicy>,

    /// Change set lifecycle (create, update, state transitions).
    pub management: Arc<ChangeSetManagementService>,

    /// Object membership.
    pub membership: Arc<ChangeSetService>,

    /// Runtime configuration (immutable after initialization).
    pub config: RuntimeConfig,
}

impl ChangeSetContainer {
    /// Create a container over an empty catalog.
    pub fn new(config: RuntimeConfig) -> Result<Self, ContainerError> {
        Self::with_catalog(config, Arc::new(InMemoryCatalog::new()))
    }

    /// Create a container over an existing catalog.
    #[instrument(name = "container_init", skip(config, catalog))]
    pub fn with_catalog(
        config: RuntimeConfig,
        catalog: Arc<InMemoryCatalog>,
    ) -> Result<Self, ContainerError> {
        config.validate()?;

        // =====================================================================
        // PHASE 1: Adapters
        // =====================================================================
        let store = Arc::new(InMemoryChangeSetStore::new());
        let event_bus = Arc::new(
            InMemoryEventBus::new().with_strict_delivery(config.change_sets.strict_event_delivery),
        );

        // =====================================================================
        // PHASE 2: Registries
        // =====================================================================
        let resolver = Arc::new(
            BusinessObjectResolver::new(TypeRegistry::catalog_defaults()?)
                .with_guid_resolvers(GuidResolverRegistry::catalog_defaults()),
        );
        let dependencies =
            DependencyResolverRegistry::catalog_defaults(catalog.clone(), &config.resolution);
        let metadata = MetadataResolverRegistry::catalog_defaults(catalog.clone(), &config.resolution);
        info!(
            dependency_resolvers = dependencies.len(),
            metadata_resolvers = metadata.len(),
            max_bundle_depth = config.resolution.max_bundle_depth,
            "Resolver registries composed"
        );

        // =====================================================================
        // PHASE 3: Policy
        // =====================================================================
        let policy = Arc::new(ChangeSetPolicy::new(
            resolver.clone(),
            dependencies,
            metadata,
            store.clone(),
        ));

        // =====================================================================
        // PHASE 4: Services
        // =====================================================================
        let management = Arc::new(ChangeSetManagementService::new(
            store.clone(),
            store.clone(),
            policy.clone(),
            Arc::new(DefaultEventFactory),
            event_bus.clone(),
            Arc::new(SystemTimeSource),
        ));
        let membership = Arc::new(ChangeSetService::new(
            store.clone(),
            store.clone(),
            policy.clone(),
            config.change_sets.clone(),
        ));

        cs_telemetry::log_event!(
            info,
            "runtime",
            "Change set container ready",
            strict_event_delivery = config.change_sets.strict_event_delivery,
            resolve_metadata_on_add = config.change_sets.resolve_metadata_on_add
        );

        Ok(Self {
            catalog,
            store,
            event_bus,
            resolver,
            policy,
            management,
            membership,
            config,
        })
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.event_bus.subscribe(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_02_change_sets::{ChangeSet, ChangeSetApi, ChangeSetManagementApi, ChangeSetState};
    use shared_bus::{EventPublisher, PublishError};
    use shared_types::{object_types, BusinessObjectDescriptor};

    #[test]
    fn test_container_wires_defaults() {
        let container = ChangeSetContainer::new(RuntimeConfig::default()).unwrap();
        assert_eq!(container.event_bus.subscriber_count(), 0);
        assert!(container.store.is_empty());
        assert_eq!(container.config.resolution.max_bundle_depth, 16);
    }

    #[test]
    fn test_services_share_one_store() {
        let container = ChangeSetContainer::new(RuntimeConfig::default()).unwrap();
        let cs = container
            .management
            .add(ChangeSet::new("CS1", "Spring").created_by("U"))
            .unwrap();
        let brand = BusinessObjectDescriptor::new(object_types::BRAND, "B1");
        assert!(container
            .membership
            .add_object_to_change_set(&cs.guid, (&brand).into(), None, None)
            .unwrap()
            .was_added());
        assert!(container.policy.is_change_allowed("CS1"));
        assert_eq!(container.store.member_count(), 1);
    }

    #[test]
    fn test_strict_delivery_is_applied_to_bus() {
        let mut config = RuntimeConfig::default();
        config.change_sets.strict_event_delivery = true;
        let container = ChangeSetContainer::new(config).unwrap();

        container
            .management
            .add(ChangeSet::new("CS1", "Spring").created_by("U"))
            .unwrap();
        let err = container
            .management
            .update_state("CS1", ChangeSetState::ReadyToPublish, None)
            .unwrap_err();
        assert!(matches!(
            err,
            cs_02_change_sets::ChangeSetError::PublishFailed {
                source: PublishError::NoSubscribers { .. },
                ..
            }
        ));
        assert_eq!(container.event_bus.events_published(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RuntimeConfig::default();
        config.resolution.max_bundle_depth = 0;
        assert!(matches!(
            ChangeSetContainer::new(config),
            Err(ContainerError::Config(ConfigError::ZeroBundleDepth))
        ));
    }
}
