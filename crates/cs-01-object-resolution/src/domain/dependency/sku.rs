use super::DependencyResolver;
use crate::ports::outbound::CatalogLookup;
use shared_types::{CatalogObject, ObjectKind, ObjectSet};
use std::sync::Arc;

/// Sku edges: owning product and the distinct sku options of its values.
pub struct ProductSkuDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl ProductSkuDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }
}

impl DependencyResolver for ProductSkuDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::ProductSku
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        let CatalogObject::ProductSku(sku) = object else {
            return deps;
        };

        deps.insert(CatalogObject::Product(sku.product.clone()));
        deps.extend(
            sku.option_values
                .iter()
                .map(|value| CatalogObject::SkuOption(value.option.clone())),
        );
        deps
    }
}
