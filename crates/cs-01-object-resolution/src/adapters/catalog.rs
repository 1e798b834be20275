//! In-memory catalog
//!
//! Implements `CatalogLookup` and answers the metadata named queries from
//! the same stored objects. Suitable for tests and single-process setups.

use crate::ports::outbound::{queries, CatalogLookup, NamedQueryService, QueryError, QueryRow};
use parking_lot::RwLock;
use shared_types::{Brand, CatalogObject, Category, ObjectKind, ProductSku};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct CatalogState {
    objects: HashMap<(ObjectKind, String), CatalogObject>,
    brands_by_code: HashMap<String, Arc<Brand>>,
    categories_by_code: HashMap<String, Arc<Category>>,
    products_by_code: HashMap<String, CatalogObject>,
    skus_by_code: HashMap<String, Arc<ProductSku>>,
}

/// Thread-safe in-memory object store.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

/// Identifier an object is stored under.
fn stored_id(object: &CatalogObject) -> &str {
    match object {
        CatalogObject::PriceListDescriptor(pld) => &pld.guid,
        CatalogObject::BaseAmount(amount) => &amount.guid,
        other => other.entity_guid().unwrap_or_default(),
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `object`, replacing any object of the same kind and id.
    pub fn insert(&self, object: CatalogObject) {
        let mut state = self.state.write();
        match &object {
            CatalogObject::Brand(brand) => {
                state.brands_by_code.insert(brand.code.clone(), brand.clone());
            }
            CatalogObject::Category(category) => {
                state
                    .categories_by_code
                    .insert(category.code.clone(), category.clone());
            }
            CatalogObject::Product(_) | CatalogObject::ProductBundle(_) => {
                if let Some(product) = object.as_product() {
                    state
                        .products_by_code
                        .insert(product.code.clone(), object.clone());
                }
            }
            CatalogObject::ProductSku(sku) => {
                state.skus_by_code.insert(sku.sku_code.clone(), sku.clone());
            }
            _ => {}
        }
        let key = (object.kind(), stored_id(&object).to_string());
        state.objects.insert(key, object);
    }

    /// Remove an object, returning it if it was stored.
    pub fn remove(&self, kind: ObjectKind, guid: &str) -> Option<CatalogObject> {
        let mut state = self.state.write();
        let removed = state.objects.remove(&(kind, guid.to_string()))?;
        match &removed {
            CatalogObject::Brand(brand) => {
                state.brands_by_code.remove(&brand.code);
            }
            CatalogObject::Category(category) => {
                state.categories_by_code.remove(&category.code);
            }
            CatalogObject::ProductSku(sku) => {
                state.skus_by_code.remove(&sku.sku_code);
            }
            other => {
                if let Some(product) = other.as_product() {
                    state.products_by_code.remove(&product.code);
                }
            }
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.state.read().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().objects.is_empty()
    }

    fn name_of(&self, kind: ObjectKind, guid: &str) -> Option<String> {
        let object = self.find_by_guid(kind, guid)?;
        let name = match &object {
            CatalogObject::Brand(o) => o.name.clone(),
            CatalogObject::Category(o) => o.name.clone(),
            CatalogObject::CategoryType(o) => o.name.clone(),
            CatalogObject::ProductType(o) => o.name.clone(),
            CatalogObject::ProductSku(o) => o.sku_code.clone(),
            CatalogObject::Attribute(o) => o.name.clone(),
            CatalogObject::SkuOption(o) => o.option_key.clone(),
            CatalogObject::PromotionRule(o) => o.name.clone(),
            CatalogObject::PriceListDescriptor(o) => o.name.clone(),
            CatalogObject::Product(_) | CatalogObject::ProductBundle(_) => {
                object.as_product()?.name.clone()
            }
            CatalogObject::BaseAmount(_) => return None,
        };
        Some(name)
    }

    fn base_amount_display(&self, guid: &str) -> Option<QueryRow> {
        let CatalogObject::BaseAmount(amount) = self.find_by_guid(ObjectKind::BaseAmount, guid)? else {
            return None;
        };
        let price_list = self
            .name_of(ObjectKind::PriceListDescriptor, &amount.price_list_descriptor_guid)
            .unwrap_or_default();
        Some(vec![
            price_list,
            amount.object_guid.clone(),
            amount.quantity.to_string(),
        ])
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn find_by_guid(&self, kind: ObjectKind, guid: &str) -> Option<CatalogObject> {
        let state = self.state.read();
        if let Some(found) = state.objects.get(&(kind, guid.to_string())) {
            return Some(found.clone());
        }
        ObjectKind::ALL
            .iter()
            .filter(|k| **k != kind && k.is_a(kind))
            .find_map(|k| state.objects.get(&(*k, guid.to_string())).cloned())
    }

    fn find_brand_by_code(&self, code: &str) -> Option<Arc<Brand>> {
        self.state.read().brands_by_code.get(code).cloned()
    }

    fn find_category_by_code(&self, code: &str) -> Option<Arc<Category>> {
        self.state.read().categories_by_code.get(code).cloned()
    }

    fn find_product_by_code(&self, code: &str) -> Option<CatalogObject> {
        self.state.read().products_by_code.get(code).cloned()
    }

    fn find_sku_by_code(&self, code: &str) -> Option<Arc<ProductSku>> {
        self.state.read().skus_by_code.get(code).cloned()
    }
}

impl NamedQueryService for InMemoryCatalog {
    fn query(&self, name: &str, params: &[&str]) -> Result<Vec<QueryRow>, QueryError> {
        let [guid] = params else {
            return Err(QueryError::BadParameters {
                name: name.to_string(),
                expected: 1,
                actual: params.len(),
            });
        };

        let name_row = |kind: ObjectKind| self.name_of(kind, guid).map(|n| vec![n]);
        let row = match name {
            queries::BRAND_NAME_BY_GUID => name_row(ObjectKind::Brand),
            queries::CATEGORY_NAME_BY_GUID => name_row(ObjectKind::Category),
            queries::PRODUCT_NAME_BY_GUID => name_row(ObjectKind::Product),
            queries::PRODUCT_TYPE_NAME_BY_GUID => name_row(ObjectKind::ProductType),
            queries::SKU_CODE_BY_GUID => name_row(ObjectKind::ProductSku),
            queries::PROMOTION_NAME_BY_GUID => name_row(ObjectKind::PromotionRule),
            queries::PRICE_LIST_NAME_BY_GUID => name_row(ObjectKind::PriceListDescriptor),
            queries::BASE_AMOUNT_DISPLAY_BY_GUID => self.base_amount_display(guid),
            other => return Err(QueryError::UnknownQuery(other.to_string())),
        };
        Ok(row.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{BaseAmount, PriceListDescriptor, Product, ProductBundle};

    fn catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog.insert(CatalogObject::Brand(Arc::new(Brand {
            guid: "B1".to_string(),
            code: "acme".to_string(),
            name: "Acme".to_string(),
        })));
        catalog.insert(CatalogObject::Product(Arc::new(Product::new("P1", "p1", "Widget"))));
        catalog.insert(CatalogObject::ProductBundle(Arc::new(ProductBundle {
            product: Product::new("BU1", "bu1", "Widget Kit"),
            constituents: vec![],
        })));
        catalog.insert(CatalogObject::PriceListDescriptor(Arc::new(PriceListDescriptor {
            guid: "PL1".to_string(),
            name: "Retail USD".to_string(),
            currency_code: "USD".to_string(),
        })));
        catalog.insert(CatalogObject::BaseAmount(Arc::new(BaseAmount {
            guid: "BA1".to_string(),
            price_list_descriptor_guid: "PL1".to_string(),
            object_type: "Product".to_string(),
            object_guid: "P1".to_string(),
            quantity: 2,
            list_value: 1999,
            sale_value: None,
        })));
        catalog
    }

    #[test]
    fn test_find_by_guid_includes_subkinds() {
        let catalog = catalog();
        let found = catalog.find_by_guid(ObjectKind::Product, "BU1").unwrap();
        assert_eq!(found.kind(), ObjectKind::ProductBundle);
        assert!(catalog.find_by_guid(ObjectKind::ProductBundle, "P1").is_none());
    }

    #[test]
    fn test_code_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.find_brand_by_code("acme").unwrap().guid, "B1");
        assert_eq!(
            catalog.find_product_by_code("bu1").unwrap().kind(),
            ObjectKind::ProductBundle
        );
        assert!(catalog.find_sku_by_code("nope").is_none());
    }

    #[test]
    fn test_remove_clears_code_index() {
        let catalog = catalog();
        assert!(catalog.remove(ObjectKind::Brand, "B1").is_some());
        assert!(catalog.find_brand_by_code("acme").is_none());
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_named_queries() {
        let catalog = catalog();
        assert_eq!(
            catalog.query(queries::PRODUCT_NAME_BY_GUID, &["BU1"]).unwrap(),
            vec![vec!["Widget Kit".to_string()]]
        );
        assert_eq!(
            catalog.query(queries::BASE_AMOUNT_DISPLAY_BY_GUID, &["BA1"]).unwrap(),
            vec![vec!["Retail USD".to_string(), "P1".to_string(), "2".to_string()]]
        );
        assert!(catalog.query(queries::BRAND_NAME_BY_GUID, &["GONE"]).unwrap().is_empty());
    }

    #[test]
    fn test_query_errors() {
        let catalog = catalog();
        assert!(matches!(
            catalog.query("NO_SUCH_QUERY", &["x"]),
            Err(QueryError::UnknownQuery(_))
        ));
        assert!(matches!(
            catalog.query(queries::BRAND_NAME_BY_GUID, &[]),
            Err(QueryError::BadParameters { expected: 1, actual: 0, .. })
        ));
    }
}
