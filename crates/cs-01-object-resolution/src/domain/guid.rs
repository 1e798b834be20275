//! Guid resolvers
//!
//! Produce the `object_identifier` half of a descriptor. Entities use their
//! standard `guid`; transfer objects need a resolver of their own.

use shared_types::{CatalogObject, ObjectKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Strategy producing a stable identifier for an object.
pub trait GuidResolver: Send + Sync {
    /// Whether this resolver understands `object`.
    fn is_supported_object(&self, object: &CatalogObject) -> bool;

    /// Identifier of `object`, `None` if it cannot be produced.
    fn resolve_guid(&self, object: &CatalogObject) -> Option<String>;
}

/// Default resolver: the entity's standard `guid`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityGuidResolver;

impl GuidResolver for EntityGuidResolver {
    fn is_supported_object(&self, object: &CatalogObject) -> bool {
        object.kind().is_entity()
    }

    fn resolve_guid(&self, object: &CatalogObject) -> Option<String> {
        object
            .entity_guid()
            .filter(|guid| !guid.is_empty())
            .map(str::to_string)
    }
}

/// Base amount transfer objects are identified by their own guid.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseAmountGuidResolver;

impl GuidResolver for BaseAmountGuidResolver {
    fn is_supported_object(&self, object: &CatalogObject) -> bool {
        matches!(object, CatalogObject::BaseAmount(_))
    }

    fn resolve_guid(&self, object: &CatalogObject) -> Option<String> {
        match object {
            CatalogObject::BaseAmount(amount) if !amount.guid.is_empty() => Some(amount.guid.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PriceListDescriptorGuidResolver;

impl GuidResolver for PriceListDescriptorGuidResolver {
    fn is_supported_object(&self, object: &CatalogObject) -> bool {
        matches!(object, CatalogObject::PriceListDescriptor(_))
    }

    fn resolve_guid(&self, object: &CatalogObject) -> Option<String> {
        match object {
            CatalogObject::PriceListDescriptor(pld) if !pld.guid.is_empty() => Some(pld.guid.clone()),
            _ => None,
        }
    }
}

/// Guid resolvers keyed by exact kind, with a default fallback.
#[derive(Clone)]
pub struct GuidResolverRegistry {
    resolvers: HashMap<ObjectKind, Arc<dyn GuidResolver>>,
    default: Arc<dyn GuidResolver>,
}

impl GuidResolverRegistry {
    /// Empty registry falling back to `default`.
    pub fn new(default: Arc<dyn GuidResolver>) -> Self {
        Self {
            resolvers: HashMap::new(),
            default,
        }
    }

    pub fn with_resolver(mut self, kind: ObjectKind, resolver: Arc<dyn GuidResolver>) -> Self {
        self.resolvers.insert(kind, resolver);
        self
    }

    /// Default resolver plus the pricing transfer object resolvers.
    pub fn catalog_defaults() -> Self {
        Self::new(Arc::new(EntityGuidResolver))
            .with_resolver(ObjectKind::BaseAmount, Arc::new(BaseAmountGuidResolver))
            .with_resolver(
                ObjectKind::PriceListDescriptor,
                Arc::new(PriceListDescriptorGuidResolver),
            )
    }

    /// Resolver registered under exactly `kind`.
    pub fn get(&self, kind: ObjectKind) -> Option<&Arc<dyn GuidResolver>> {
        self.resolvers.get(&kind)
    }

    pub fn default_resolver(&self) -> &Arc<dyn GuidResolver> {
        &self.default
    }

    /// Resolve through the exact-kind resolver when it supports `object`,
    /// else through the default.
    pub fn resolve(&self, kind: ObjectKind, object: &CatalogObject) -> Option<String> {
        match self.get(kind) {
            Some(resolver) if resolver.is_supported_object(object) => resolver.resolve_guid(object),
            _ => self.default.resolve_guid(object),
        }
    }
}

impl Default for GuidResolverRegistry {
    fn default() -> Self {
        Self::catalog_defaults()
    }
}
