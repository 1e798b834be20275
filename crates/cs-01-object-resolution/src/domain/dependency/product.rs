use super::DependencyResolver;
use crate::ports::outbound::CatalogLookup;
use shared_types::{BundleConstituent, CatalogObject, ObjectKind, ObjectSet, ProductBundle};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Product edges: brand, product type, categories, association targets.
///
/// Applies to bundles too, through their product part.
pub struct ProductDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl ProductDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }
}

impl DependencyResolver for ProductDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::Product
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        let Some(product) = object.as_product() else {
            return deps;
        };

        if let Some(brand) = &product.brand {
            deps.insert(CatalogObject::Brand(brand.clone()));
        }
        if let Some(product_type) = &product.product_type {
            deps.insert(CatalogObject::ProductType(product_type.clone()));
        }
        deps.extend(
            product
                .categories
                .iter()
                .map(|c| CatalogObject::Category(c.clone())),
        );
        deps.extend(
            product
                .associations
                .iter()
                .map(|a| CatalogObject::Product(a.target.clone())),
        );
        deps
    }
}

/// Bundle edges: every constituent, recursively through nested bundles.
///
/// Nested bundles are dependencies themselves. Each bundle is walked once
/// and nesting beyond `max_depth` is not followed.
pub struct ProductBundleDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
    max_depth: usize,
}

impl ProductBundleDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>, max_depth: usize) -> Self {
        Self { catalog, max_depth }
    }

    fn collect(
        &self,
        bundle: &ProductBundle,
        depth: usize,
        visited: &mut HashSet<String>,
        deps: &mut ObjectSet,
    ) {
        if depth >= self.max_depth {
            warn!(
                bundle = %bundle.product.guid,
                max_depth = self.max_depth,
                "Bundle nesting limit reached, not descending further"
            );
            return;
        }

        for constituent in &bundle.constituents {
            match constituent {
                BundleConstituent::Product(product) => {
                    deps.insert(CatalogObject::Product(product.clone()));
                }
                BundleConstituent::Bundle(nested) => {
                    deps.insert(CatalogObject::ProductBundle(nested.clone()));
                    if visited.insert(nested.product.guid.clone()) {
                        self.collect(nested, depth + 1, visited, deps);
                    }
                }
            }
        }
    }
}

impl DependencyResolver for ProductBundleDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::ProductBundle
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        if let CatalogObject::ProductBundle(bundle) = object {
            let mut visited = HashSet::from([bundle.product.guid.clone()]);
            self.collect(bundle, 0, &mut visited, &mut deps);
        }
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use shared_types::{AssociationType, Product};

    #[test]
    fn test_product_dependencies_in_order() {
        let b1 = brand("B1", "acme");
        let pt = product_type("PT1");
        let c1 = category("C1");
        let c2 = category("C2");
        let target = product("P9");
        let p1 = Product::new("P1", "p1", "P1")
            .with_brand(b1.clone())
            .with_type(pt.clone())
            .with_category(c1.clone())
            .with_category(c2.clone())
            .with_association(AssociationType::CrossSell, target.clone());

        let resolver = ProductDependencyResolver::new(catalog(&[]));
        let deps = resolver.get_change_set_dependency(&CatalogObject::Product(Arc::new(p1)));

        assert_eq!(
            deps.into_iter().collect::<Vec<_>>(),
            vec![
                CatalogObject::Brand(b1),
                CatalogObject::ProductType(pt),
                CatalogObject::Category(c1),
                CatalogObject::Category(c2),
                CatalogObject::Product(target),
            ]
        );
    }

    #[test]
    fn test_bare_product_has_no_dependencies() {
        let resolver = ProductDependencyResolver::new(catalog(&[]));
        assert!(resolver
            .get_change_set_dependency(&CatalogObject::Product(product("P1")))
            .is_empty());
    }

    #[test]
    fn test_bundle_recurses_into_nested_bundles() {
        let p1 = product("P1");
        let p2 = product("P2");
        let p3 = product("P3");
        let inner = bundle(
            "INNER",
            vec![
                BundleConstituent::Product(p2.clone()),
                BundleConstituent::Product(p1.clone()),
            ],
        );
        let outer = bundle(
            "OUTER",
            vec![
                BundleConstituent::Product(p1.clone()),
                BundleConstituent::Bundle(inner.clone()),
                BundleConstituent::Product(p3.clone()),
            ],
        );

        let resolver = ProductBundleDependencyResolver::new(catalog(&[]), 16);
        let deps = resolver.get_change_set_dependency(&CatalogObject::ProductBundle(outer));

        assert_eq!(
            deps.into_iter().collect::<Vec<_>>(),
            vec![
                CatalogObject::Product(p1),
                CatalogObject::ProductBundle(inner),
                CatalogObject::Product(p2),
                CatalogObject::Product(p3),
            ]
        );
    }

    #[test]
    fn test_bundle_depth_limit() {
        let deep = bundle("DEEP", vec![BundleConstituent::Product(product("P1"))]);
        let middle = bundle("MIDDLE", vec![BundleConstituent::Bundle(deep.clone())]);
        let top = bundle("TOP", vec![BundleConstituent::Bundle(middle.clone())]);

        let resolver = ProductBundleDependencyResolver::new(catalog(&[]), 2);
        let deps = resolver.get_change_set_dependency(&CatalogObject::ProductBundle(top));

        // DEEP is listed by MIDDLE but its constituents lie beyond the limit
        assert_eq!(
            deps.into_iter().collect::<Vec<_>>(),
            vec![
                CatalogObject::ProductBundle(middle),
                CatalogObject::ProductBundle(deep),
            ]
        );
    }

    #[test]
    fn test_bundle_resolution_is_deterministic() {
        let outer = bundle(
            "OUTER",
            vec![
                BundleConstituent::Product(product("P2")),
                BundleConstituent::Product(product("P1")),
            ],
        );
        let object = CatalogObject::ProductBundle(outer);
        let resolver = ProductBundleDependencyResolver::new(catalog(&[]), 16);
        assert_eq!(
            resolver.get_change_set_dependency(&object),
            resolver.get_change_set_dependency(&object)
        );
    }
}
