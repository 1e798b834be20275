//! Dependency and metadata resolution over the demo catalog.

use super::{descriptor, engine, engine_with};
use cs_01_object_resolution::{CatalogLookup, PRICE_LIST_NAME_KEY};
use cs_02_change_sets::{ChangeSet, ChangeSetApi, ChangeSetManagementApi};
use cs_runtime::RuntimeConfig;
use shared_types::{object_types, BusinessObjectDescriptor, ObjectKind, OBJECT_NAME_KEY};

fn deps_of(object_type: &str, id: &str, expected: ObjectKind) -> Vec<BusinessObjectDescriptor> {
    engine()
        .policy
        .get_dependent_objects(&descriptor(object_type, id), expected)
        .into_iter().collect::<Vec<_>>()
}

#[test]
fn test_product_dependencies() {
    assert_eq!(
        deps_of(object_types::PRODUCT, "P1", ObjectKind::Product),
        vec![
            descriptor(object_types::BRAND, "B1"),
            descriptor(object_types::PRODUCT_TYPE, "PT1"),
            descriptor(object_types::CATEGORY, "C1"),
        ]
    );
}

#[test]
fn test_sku_dependencies() {
    assert_eq!(
        deps_of(object_types::PRODUCT_SKU, "SKU1", ObjectKind::ProductSku),
        vec![
            descriptor(object_types::PRODUCT, "P1"),
            descriptor(object_types::SKU_OPTION, "O1"),
        ]
    );
}

#[test]
fn test_product_type_dependencies() {
    assert_eq!(
        deps_of(object_types::PRODUCT_TYPE, "PT1", ObjectKind::ProductType),
        vec![
            descriptor(object_types::ATTRIBUTE, "A1"),
            descriptor(object_types::SKU_OPTION, "O1"),
        ]
    );
}

#[test]
fn test_category_depends_on_its_type() {
    assert_eq!(
        deps_of(object_types::CATEGORY, "C1", ObjectKind::Category),
        vec![descriptor(object_types::CATEGORY_TYPE, "CT1")]
    );
}

#[test]
fn test_promotion_dependencies_by_code() {
    assert_eq!(
        deps_of(object_types::PROMOTION, "PR1", ObjectKind::PromotionRule),
        vec![descriptor(object_types::BRAND, "B1")]
    );
}

#[test]
fn test_price_depends_on_price_list() {
    assert_eq!(
        deps_of(object_types::PRICE, "BA1", ObjectKind::BaseAmount),
        vec![descriptor(object_types::PRICE_LIST, "PL1")]
    );
}

#[test]
fn test_leaf_and_missing_objects_have_no_dependencies() {
    assert!(deps_of(object_types::BRAND, "B1", ObjectKind::Brand).is_empty());
    assert!(deps_of(object_types::PRODUCT, "NOPE", ObjectKind::Product).is_empty());
}

#[test]
fn test_descriptors_of_live_objects() {
    let engine = engine();
    let amount = engine
        .catalog
        .find_by_guid(ObjectKind::BaseAmount, "BA1")
        .unwrap();
    assert_eq!(
        engine.resolver.resolve_object_descriptor(&amount),
        Some(descriptor(object_types::PRICE, "BA1"))
    );
    let sku = engine
        .catalog
        .find_by_guid(ObjectKind::ProductSku, "SKU1")
        .unwrap();
    assert_eq!(
        engine.resolver.resolve_object_descriptor(&sku),
        Some(descriptor(object_types::PRODUCT_SKU, "SKU1"))
    );
}

#[test]
fn test_price_metadata() {
    let engine = engine();
    let metadata = engine
        .policy
        .resolve_meta_data(&descriptor(object_types::PRICE, "BA1"))
        .unwrap();
    assert_eq!(metadata.get(OBJECT_NAME_KEY).map(String::as_str), Some("P1 (qty 1)"));
    assert_eq!(
        metadata.get(PRICE_LIST_NAME_KEY).map(String::as_str),
        Some("Retail USD")
    );
}

#[test]
fn test_metadata_resolved_on_add_by_config() {
    let mut config = RuntimeConfig::default();
    config.change_sets.resolve_metadata_on_add = true;
    let engine = engine_with(config);
    engine
        .management
        .add(ChangeSet::new("CS1", "Promotions").created_by("U"))
        .unwrap();

    let promotion = descriptor(object_types::PROMOTION, "PR1");
    engine
        .membership
        .add_object_to_change_set("CS1", (&promotion).into(), None, None)
        .unwrap();

    let members = engine.membership.find_members("CS1").unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].object_name(), Some("Acme week"));
}

#[test]
fn test_conflicting_dependencies_across_change_sets() {
    let engine = engine();
    for guid in ["CS1", "CS2"] {
        engine
            .management
            .add(ChangeSet::new(guid, guid).created_by("U"))
            .unwrap();
    }
    let brand = descriptor(object_types::BRAND, "B1");
    let category = descriptor(object_types::CATEGORY, "C1");
    engine
        .membership
        .add_object_to_change_set("CS2", (&brand).into(), None, None)
        .unwrap();
    engine
        .membership
        .add_object_to_change_set("CS1", (&category).into(), None, None)
        .unwrap();

    let conflicts = engine
        .membership
        .find_conflicting_dependencies(
            "CS1",
            &descriptor(object_types::PRODUCT, "P1"),
            ObjectKind::Product,
        )
        .unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts.get(&brand).map(|cs| cs.guid.as_str()), Some("CS2"));
}

#[test]
fn test_sub_class_first_order() {
    let engine = engine();
    let order: Vec<ObjectKind> = engine
        .resolver
        .get_sub_class_first_set([ObjectKind::Product, ObjectKind::Brand, ObjectKind::ProductBundle])
        .into_iter()
        .collect();
    assert_eq!(order[0], ObjectKind::ProductBundle);
    let bundle = order.iter().position(|k| *k == ObjectKind::ProductBundle);
    let product = order.iter().position(|k| *k == ObjectKind::Product);
    assert!(bundle < product);
    assert_eq!(order.len(), 3);
}
