//! Business Object Resolver - maps live objects to descriptors and back

use crate::domain::guid::{EntityGuidResolver, GuidResolver, GuidResolverRegistry};
use crate::domain::registry::TypeRegistry;
use shared_types::{BusinessObjectDescriptor, CatalogObject, DescriptorSet, IndexSet, ObjectKind};
use std::sync::Arc;
use tracing::debug;

/// Resolves catalog objects to `BusinessObjectDescriptor`s.
///
/// ## Resolution
///
/// 1. Primary table: the most specific registered kind the object is
///    assignable to names the object type; the guid resolver registered
///    under that kind produces the identifier.
/// 2. Transfer object table: exact kind match.
/// 3. Anything else resolves to `None`.
///
/// Without a guid resolver registry every identifier comes from the default
/// resolver.
pub struct BusinessObjectResolver {
    types: TypeRegistry,
    guid_resolvers: Option<GuidResolverRegistry>,
    default_guid_resolver: Arc<dyn GuidResolver>,
}

impl BusinessObjectResolver {
    /// Resolver over `types` with no guid resolver registry.
    pub fn new(types: TypeRegistry) -> Self {
        Self {
            types,
            guid_resolvers: None,
            default_guid_resolver: Arc::new(EntityGuidResolver),
        }
    }

    pub fn with_guid_resolvers(mut self, registry: GuidResolverRegistry) -> Self {
        self.default_guid_resolver = registry.default_resolver().clone();
        self.guid_resolvers = Some(registry);
        self
    }

    pub fn type_registry(&self) -> &TypeRegistry {
        &self.types
    }

    /// Descriptor of `object`, `None` when its kind is unregistered or no
    /// identifier can be produced.
    pub fn resolve_object_descriptor(&self, object: &CatalogObject) -> Option<BusinessObjectDescriptor> {
        let kind = object.kind();

        let (resolved_kind, object_type) = match self.types.most_specific(kind) {
            Some(reg) => (reg.kind, reg.object_type.as_str()),
            None => match self.types.transfer_object_type(kind) {
                Some(object_type) => (kind, object_type),
                None => {
                    debug!(kind = %kind, "No object type registered");
                    return None;
                }
            },
        };

        match self.guid_for(resolved_kind, object) {
            Some(guid) => Some(BusinessObjectDescriptor::new(object_type, guid)),
            None => {
                debug!(kind = %kind, object_type, "Object has no resolvable guid");
                None
            }
        }
    }

    /// Resolve each object in turn, keeping input order and dropping the
    /// ones that do not resolve.
    pub fn resolve_object_descriptors<'a>(
        &self,
        objects: impl IntoIterator<Item = &'a CatalogObject>,
    ) -> DescriptorSet {
        objects
            .into_iter()
            .filter_map(|object| self.resolve_object_descriptor(object))
            .collect()
    }

    /// Identifier of `object` using the resolver registered for its exact
    /// kind, else the default resolver.
    pub fn resolve_object_guid(&self, object: &CatalogObject) -> Option<String> {
        self.guid_for(object.kind(), object)
    }

    /// Kind registered under the descriptor's object type.
    pub fn get_object_class(&self, descriptor: &BusinessObjectDescriptor) -> Option<ObjectKind> {
        self.types.kind_of_descriptor(descriptor)
    }

    /// Order `kinds` so that each subtype precedes its supertypes.
    pub fn get_sub_class_first_set(
        &self,
        kinds: impl IntoIterator<Item = ObjectKind>,
    ) -> IndexSet<ObjectKind> {
        self.types.sub_class_first(kinds).into_iter().collect()
    }

    fn guid_for(&self, kind: ObjectKind, object: &CatalogObject) -> Option<String> {
        match &self.guid_resolvers {
            Some(registry) => registry.resolve(kind, object),
            None => self.default_guid_resolver.resolve_guid(object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{
        object_types, BaseAmount, Brand, PriceListDescriptor, Product, ProductBundle,
    };

    fn resolver() -> BusinessObjectResolver {
        BusinessObjectResolver::new(TypeRegistry::catalog_defaults().unwrap())
            .with_guid_resolvers(GuidResolverRegistry::catalog_defaults())
    }

    fn bundle(guid: &str) -> CatalogObject {
        CatalogObject::ProductBundle(Arc::new(ProductBundle {
            product: Product::new(guid, "kit", "Kit"),
            constituents: vec![],
        }))
    }

    fn amount(guid: &str) -> CatalogObject {
        CatalogObject::BaseAmount(Arc::new(BaseAmount {
            guid: guid.to_string(),
            price_list_descriptor_guid: "PL1".to_string(),
            object_type: "Product".to_string(),
            object_guid: "P1".to_string(),
            quantity: 1,
            list_value: 500,
            sale_value: None,
        }))
    }

    #[test]
    fn test_bundle_resolves_to_most_specific_type() {
        let descriptor = resolver().resolve_object_descriptor(&bundle("BU1")).unwrap();
        assert_eq!(
            descriptor,
            BusinessObjectDescriptor::new(object_types::PRODUCT_BUNDLE, "BU1")
        );
    }

    #[test]
    fn test_transfer_object_resolves_through_exact_table() {
        let descriptor = resolver().resolve_object_descriptor(&amount("BA1")).unwrap();
        assert_eq!(descriptor, BusinessObjectDescriptor::new(object_types::PRICE, "BA1"));
    }

    #[test]
    fn test_unregistered_kind_is_absent() {
        let types = TypeRegistry::builder()
            .register(ObjectKind::Product, object_types::PRODUCT, 10)
            .build()
            .unwrap();
        let resolver = BusinessObjectResolver::new(types);
        let brand = CatalogObject::Brand(Arc::new(Brand {
            guid: "B1".to_string(),
            code: "acme".to_string(),
            name: "Acme".to_string(),
        }));
        assert!(resolver.resolve_object_descriptor(&brand).is_none());
        assert!(resolver.resolve_object_descriptor(&amount("BA1")).is_none());
    }

    #[test]
    fn test_without_guid_registry_default_resolver_is_used() {
        let resolver = BusinessObjectResolver::new(TypeRegistry::catalog_defaults().unwrap());
        assert_eq!(
            resolver.resolve_object_descriptor(&bundle("BU1")).map(|d| d.object_identifier),
            Some("BU1".to_string())
        );
        // The default resolver cannot identify a transfer object
        assert!(resolver.resolve_object_descriptor(&amount("BA1")).is_none());
    }

    #[test]
    fn test_batch_preserves_order_and_drops_unresolvable() {
        let pld = CatalogObject::PriceListDescriptor(Arc::new(PriceListDescriptor {
            guid: String::new(),
            name: "Unsaved".to_string(),
            currency_code: "USD".to_string(),
        }));
        let objects = vec![amount("BA2"), pld, bundle("BU1"), amount("BA2")];
        let descriptors = resolver().resolve_object_descriptors(&objects);
        assert_eq!(
            descriptors.into_iter().collect::<Vec<_>>(),
            vec![
                BusinessObjectDescriptor::new(object_types::PRICE, "BA2"),
                BusinessObjectDescriptor::new(object_types::PRODUCT_BUNDLE, "BU1"),
            ]
        );
    }

    #[test]
    fn test_get_object_class() {
        let resolver = resolver();
        assert_eq!(
            resolver.get_object_class(&BusinessObjectDescriptor::new("Product Bundle", "X")),
            Some(ObjectKind::ProductBundle)
        );
        assert_eq!(
            resolver.get_object_class(&BusinessObjectDescriptor::new("Unknown", "X")),
            None
        );
    }

    #[test]
    fn test_sub_class_first_set() {
        let set = resolver().get_sub_class_first_set([ObjectKind::Product, ObjectKind::ProductBundle]);
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![ObjectKind::ProductBundle, ObjectKind::Product]
        );
    }

    fn any_object() -> impl Strategy<Value = CatalogObject> {
        (0usize..4, "[A-Z][A-Z0-9]{0,6}").prop_map(|(pick, guid)| match pick {
            0 => CatalogObject::Product(Arc::new(Product::new(guid, "code", "name"))),
            1 => bundle(&guid),
            2 => amount(&guid),
            _ => CatalogObject::Brand(Arc::new(Brand {
                guid,
                code: "code".to_string(),
                name: "name".to_string(),
            })),
        })
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent(object in any_object()) {
            let resolver = resolver();
            let first = resolver.resolve_object_descriptor(&object);
            let second = resolver.resolve_object_descriptor(&object);
            prop_assert!(first.is_some());
            prop_assert_eq!(first, second);
        }
    }
}
