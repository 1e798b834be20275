//! Demo catalog used by the `cs-runtime` binary and the integration tests.

use std::sync::Arc;

use cs_01_object_resolution::InMemoryCatalog;
use shared_types::{
    Attribute, BaseAmount, Brand, CatalogObject, Category, CategoryType, PriceListDescriptor,
    Product, ProductSku, ProductType, PromotionRule, RuleParameter, RuleParameterKey, SkuOption,
    SkuOptionValue,
};

/// Insert a small connected catalog:
///
/// ```text
/// P1 "Widget" ── brand B1, type PT1, category C1 (type CT1)
/// SKU1 ── product P1, option O1 = "large"
/// PR1 ── promotion on brand "acme"
/// PL1 ── price list, BA1 ── P1 @ qty 1
/// ```
pub fn seed_demo_catalog(catalog: &InMemoryCatalog) {
    let brand = Arc::new(Brand {
        guid: "B1".to_string(),
        code: "acme".to_string(),
        name: "Acme".to_string(),
    });
    let category_type = Arc::new(CategoryType {
        guid: "CT1".to_string(),
        name: "Hardware".to_string(),
    });
    let category = Arc::new(Category::new("C1", "tools", "Tools").with_type(category_type.clone()));
    let size = Arc::new(SkuOption {
        guid: "O1".to_string(),
        option_key: "size".to_string(),
    });
    let weight = Arc::new(Attribute {
        guid: "A1".to_string(),
        key: "weight".to_string(),
        name: "Weight".to_string(),
    });
    let product_type = Arc::new(ProductType {
        guid: "PT1".to_string(),
        name: "Hand tool".to_string(),
        product_attributes: vec![weight.clone()],
        sku_attributes: Vec::new(),
        sku_options: vec![size.clone()],
    });
    let product = Arc::new(
        Product::new("P1", "widget", "Widget")
            .with_brand(brand.clone())
            .with_type(product_type.clone())
            .with_category(category.clone()),
    );
    let sku = Arc::new(ProductSku {
        guid: "SKU1".to_string(),
        sku_code: "widget-l".to_string(),
        product: product.clone(),
        option_values: vec![SkuOptionValue {
            value_key: "large".to_string(),
            option: size.clone(),
        }],
    });

    catalog.insert(CatalogObject::Brand(brand));
    catalog.insert(CatalogObject::CategoryType(category_type));
    catalog.insert(CatalogObject::Category(category));
    catalog.insert(CatalogObject::SkuOption(size));
    catalog.insert(CatalogObject::Attribute(weight));
    catalog.insert(CatalogObject::ProductType(product_type));
    catalog.insert(CatalogObject::Product(product));
    catalog.insert(CatalogObject::ProductSku(sku));
    catalog.insert(CatalogObject::PromotionRule(Arc::new(PromotionRule {
        guid: "PR1".to_string(),
        name: "Acme week".to_string(),
        parameters: vec![
            RuleParameter::new(RuleParameterKey::BrandCode, "acme"),
            RuleParameter::new(RuleParameterKey::DiscountPercent, "10"),
        ],
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
        quantity: 1,
        list_value: 1999,
        sale_value: None,
    })));
}
