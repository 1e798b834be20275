use super::DependencyResolver;
use crate::ports::outbound::CatalogLookup;
use shared_types::{CatalogObject, ObjectKind, ObjectSet};
use std::sync::Arc;
use tracing::debug;

/// Base amount edge: the price list descriptor it belongs to.
pub struct PriceDependencyResolver {
    catalog: Arc<dyn CatalogLookup>,
}

impl PriceDependencyResolver {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }
}

impl DependencyResolver for PriceDependencyResolver {
    fn handled_kind(&self) -> ObjectKind {
        ObjectKind::BaseAmount
    }

    fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    fn get_change_set_dependency(&self, object: &CatalogObject) -> ObjectSet {
        let mut deps = ObjectSet::new();
        let CatalogObject::BaseAmount(amount) = object else {
            return deps;
        };

        match self
            .catalog
            .find_by_guid(ObjectKind::PriceListDescriptor, &amount.price_list_descriptor_guid)
        {
            Some(price_list) => {
                deps.insert(price_list);
            }
            None => debug!(
                base_amount = %amount.guid,
                price_list = %amount.price_list_descriptor_guid,
                "Price list descriptor not found"
            ),
        }
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use shared_types::{BaseAmount, PriceListDescriptor};

    fn amount(price_list: &str) -> CatalogObject {
        CatalogObject::BaseAmount(Arc::new(BaseAmount {
            guid: "BA1".to_string(),
            price_list_descriptor_guid: price_list.to_string(),
            object_type: "Product".to_string(),
            object_guid: "P1".to_string(),
            quantity: 1,
            list_value: 1000,
            sale_value: Some(800),
        }))
    }

    #[test]
    fn test_amount_depends_on_price_list() {
        let pld = CatalogObject::PriceListDescriptor(Arc::new(PriceListDescriptor {
            guid: "PL1".to_string(),
            name: "Retail".to_string(),
            currency_code: "USD".to_string(),
        }));
        let resolver = PriceDependencyResolver::new(catalog(&[pld.clone()]));
        assert_eq!(
            resolver.get_change_set_dependency(&amount("PL1")).into_iter().collect::<Vec<_>>(),
            vec![pld]
        );
    }

    #[test]
    fn test_missing_price_list_is_skipped() {
        let resolver = PriceDependencyResolver::new(catalog(&[]));
        assert!(resolver.get_change_set_dependency(&amount("GONE")).is_empty());
    }
}
