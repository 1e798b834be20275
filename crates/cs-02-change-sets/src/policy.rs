//! Change set policy
//!
//! Answers the questions the services ask before mutating anything: is the
//! change set open, what does an object depend on, who already owns it.

use crate::domain::ChangeSetState;
use crate::error::ChangeSetResult;
use crate::ports::outbound::ChangeSetDao;
use cs_01_object_resolution::{
    BusinessObjectResolver, DependencyResolverRegistry, MetadataResolverRegistry,
};
use shared_types::{
    BusinessObjectDescriptor, CatalogObject, DescriptorSet, Metadata, ObjectKind, ObjectSet,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates the resolver registries and the change set DAO.
pub struct ChangeSetPolicy {
    resolver: Arc<BusinessObjectResolver>,
    dependencies: DependencyResolverRegistry,
    metadata: MetadataResolverRegistry,
    change_sets: Arc<dyn ChangeSetDao>,
}

impl ChangeSetPolicy {
    pub fn new(
        resolver: Arc<BusinessObjectResolver>,
        dependencies: DependencyResolverRegistry,
        metadata: MetadataResolverRegistry,
        change_sets: Arc<dyn ChangeSetDao>,
    ) -> Self {
        Self {
            resolver,
            dependencies,
            metadata,
            change_sets,
        }
    }

    pub fn resolver(&self) -> &BusinessObjectResolver {
        &self.resolver
    }

    /// True only when change set `guid` exists and is open. Never fails.
    pub fn is_change_allowed(&self, guid: &str) -> bool {
        match self.change_sets.find_by_guid(guid) {
            Ok(Some(change_set)) => change_set.state.is_mutable(),
            Ok(None) => false,
            Err(e) => {
                warn!(guid, error = %e, "Change set lookup failed, refusing change");
                false
            }
        }
    }

    /// True only when the change set of `object_group_id` exists and is
    /// open.
    pub fn can_remove(&self, object_group_id: &str) -> bool {
        match self.change_sets.find_by_object_group_id(object_group_id) {
            Ok(Some(change_set)) => change_set.state.is_mutable(),
            Ok(None) => false,
            Err(e) => {
                warn!(object_group_id, error = %e, "Change set lookup failed, refusing removal");
                false
            }
        }
    }

    /// Merged metadata of every applicable resolver, empty when none apply.
    pub fn resolve_meta_data(&self, descriptor: &BusinessObjectDescriptor) -> ChangeSetResult<Metadata> {
        Ok(self.metadata.resolve_meta_data(descriptor)?)
    }

    /// Descriptors of everything the described object depends on.
    ///
    /// Every resolver applicable to `expected` loads the object and reports
    /// its dependencies; the union is resolved to descriptors in one batch.
    pub fn get_dependent_objects(
        &self,
        descriptor: &BusinessObjectDescriptor,
        expected: ObjectKind,
    ) -> DescriptorSet {
        let mut union = ObjectSet::new();
        for resolver in self.dependencies.applicable(expected) {
            match resolver.get_object(descriptor, expected) {
                Some(object) => union.extend(resolver.get_change_set_dependency(&object)),
                None => debug!(
                    object_type = %descriptor.object_type,
                    object_identifier = %descriptor.object_identifier,
                    resolver_kind = %resolver.handled_kind(),
                    "Object not found for dependency resolution"
                ),
            }
        }
        self.resolver.resolve_object_descriptors(&union)
    }

    /// Guids of the non-finalized change sets holding `descriptor`.
    pub fn get_object_membership_guids(
        &self,
        descriptor: &BusinessObjectDescriptor,
    ) -> ChangeSetResult<Vec<String>> {
        Ok(self
            .change_sets
            .find_by_object(descriptor, &ChangeSetState::NON_FINALIZED)?
            .into_iter()
            .map(|cs| cs.guid)
            .collect())
    }

    /// States considered in flight.
    pub fn get_non_finalized_states(&self) -> BTreeSet<ChangeSetState> {
        ChangeSetState::NON_FINALIZED.into_iter().collect()
    }

    pub fn resolve_object_descriptor(&self, object: &CatalogObject) -> Option<BusinessObjectDescriptor> {
        self.resolver.resolve_object_descriptor(object)
    }
}
