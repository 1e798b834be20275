//! Dependency resolvers
//!
//! One resolver per object family. A resolver declares the kind it handles
//! and applies to that kind and every subkind, so several resolvers may
//! apply to one object (a bundle is handled by both the product and the
//! bundle resolver). Results of all applicable resolvers are unioned.

mod category;
mod price;
mod product;
mod product_type;
mod promotion;
mod sku;

pub use category::{CategoryDependencyResolver, CategoryTypeDependencyResolver};
pub use price::PriceDependencyResolver;
pub use product::{ProductBundleDependencyResolver, ProductDependencyResolver};
pub use product_type::ProductTypeDependencyResolver;
pub use promotion::PromotionRuleDependencyResolver;
pub use sku::ProductSkuDependencyResolver;

use crate::config::ResolutionConfig;
use crate::ports::outbound::CatalogLookup;
use shared_types::{BusinessObjectDescriptor, CatalogObject, ObjectKind, ObjectSet};
use std::collections::HashMap;
use std::sync::Arc;

/// Strategy computing the objects an edit to `object` implicitly requires.
pub trait DependencyResolver: Send + Sync {
    /// Kind this resolver handles (subkinds included).
    fn handled_kind(&self) -> ObjectKind;

    /// Catalog used to load objects by descriptor.
    fn catalog(&self) -> &dyn CatalogLookup;

    /// Dependencies of `object`, insertion-ordered.
    ///
    /// Empty when `object` is not of the handled kind.
    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet;

    /// Load the object named by `descriptor` as `expected`.
    ///
    /// `None` when this resolver does not apply to `expected` or no object
    /// of that kind carries the identifier.
    fn get_object(
        &self,
        descriptor: &BusinessObjectDescriptor,
        expected: ObjectKind,
    ) -> Option<CatalogObject> {
        if !expected.is_a(self.handled_kind()) {
            return None;
        }
        self.catalog()
            .find_by_guid(expected, &descriptor.object_identifier)
            .filter(|object| object.kind().is_a(expected))
    }

    /// Whether this resolver applies to objects of `kind`.
    fn applies_to(&self, kind: ObjectKind) -> bool {
        kind.is_a(self.handled_kind())
    }
}

/// Ordered dependency resolvers with a precomputed per-kind index.
#[derive(Clone, Default)]
pub struct DependencyResolverRegistry {
    resolvers: Vec<Arc<dyn DependencyResolver>>,
    by_kind: HashMap<ObjectKind, Vec<usize>>,
}

impl DependencyResolverRegistry {
    /// Registry over `resolvers`, kept in the given order.
    pub fn new(resolvers: Vec<Arc<dyn DependencyResolver>>) -> Self {
        let by_kind = ObjectKind::ALL
            .iter()
            .map(|kind| {
                let applicable = resolvers
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.applies_to(*kind))
                    .map(|(i, _)| i)
                    .collect();
                (*kind, applicable)
            })
            .collect();
        Self { resolvers, by_kind }
    }

    /// Every catalog, promotion and price resolver over one catalog.
    pub fn catalog_defaults(catalog: Arc<dyn CatalogLookup>, config: &ResolutionConfig) -> Self {
        Self::new(vec![
            Arc::new(CategoryDependencyResolver::new(catalog.clone())),
            Arc::new(CategoryTypeDependencyResolver::new(catalog.clone())),
            Arc::new(ProductDependencyResolver::new(catalog.clone())),
            Arc::new(ProductBundleDependencyResolver::new(
                catalog.clone(),
                config.max_bundle_depth,
            )),
            Arc::new(ProductTypeDependencyResolver::new(catalog.clone())),
            Arc::new(ProductSkuDependencyResolver::new(catalog.clone())),
            Arc::new(PromotionRuleDependencyResolver::new(catalog.clone())),
            Arc::new(PriceDependencyResolver::new(catalog)),
        ])
    }

    /// Resolvers applicable to `kind`, in registration order.
    pub fn applicable(&self, kind: ObjectKind) -> impl Iterator<Item = &Arc<dyn DependencyResolver>> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|i| self.resolvers.get(*i))
    }

    /// Union of the dependencies reported by every applicable resolver.
    pub fn dependencies_of(&self, object: &CatalogObject) -> ObjectSet {
        let mut union = ObjectSet::new();
        for resolver in self.applicable(object.kind()) {
            union.extend(resolver.get_change_set_dependency(object));
        }
        union
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
