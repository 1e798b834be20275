use super::DependencyResolver;
use crate::ports::outbound::CatalogLookup;
use shared_types::{CatalogObject, ObjectKind, ObjectSet};
use std::sync::Arc;

/// Product type edges: product attributes, sku attributes, sku options.
pub struct ProductTypeDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl ProductTypeDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }
}

impl DependencyResolver for ProductTypeDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::ProductType
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        let CatalogObject::ProductType(product_type) = object else {
            return deps;
        };

        deps.extend(
            product_type
                .product_attributes
                .iter()
                .chain(&product_type.sku_attributes)
                .map(|a| CatalogObject::Attribute(a.clone())),
        );
        deps.extend(
            product_type
                .sku_options
                .iter()
                .map(|o| CatalogObject::SkuOption(o.clone())),
        );
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_shared_attributes_listed_once() {
        // A1 appears in both attribute groups
        let pt = product_type("PT1");
        let resolver = ProductTypeDependencyResolver::new(catalog(&[]));
        let deps = resolver.get_change_set_dependency(&CatalogObject::ProductType(pt));

        assert_eq!(
            deps.into_iter().collect::<Vec<_>>(),
            vec![
                CatalogObject::Attribute(attribute("A1")),
                CatalogObject::Attribute(attribute("A2")),
                CatalogObject::SkuOption(sku_option("O1")),
            ]
        );
    }
}
