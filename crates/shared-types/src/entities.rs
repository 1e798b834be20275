//! # Catalog Domain Entities
//!
//! Defines the catalog, pricing and promotion objects that can be placed in a
//! change set.
//!
//! ## Clusters
//!
//! - **Catalog**: `Brand`, `Category`, `CategoryType`, `Product`, `ProductBundle`,
//!   `ProductType`, `ProductSku`, `Attribute`, `SkuOption`
//! - **Promotion**: `PromotionRule`, `RuleParameter`
//! - **Pricing (transfer objects)**: `PriceListDescriptor`, `BaseAmount`
//!
//! Entities carry the standard `guid` identity. Pricing transfer objects do
//! not: their identifier is produced by a registered guid resolver.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Globally unique identifier of an entity.
pub type Guid = String;

/// Live objects in first-seen order, without duplicates. Dependency
/// resolution returns these so repeated calls yield identical sequences.
pub type ObjectSet = IndexSet<CatalogObject>;

// =============================================================================
// OBJECT KINDS
// =============================================================================

/// Runtime kind of a catalog object.
///
/// Kinds form a static specialisation hierarchy: a `ProductBundle` is a
/// `Product`, so every strategy that applies to products also applies to
/// bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Brand,
    Category,
    CategoryType,
    Product,
    ProductBundle,
    ProductType,
    ProductSku,
    Attribute,
    SkuOption,
    PromotionRule,
    PriceListDescriptor,
    BaseAmount,
}

impl ObjectKind {
    /// Every kind, in declaration order.
    pub const ALL: [ObjectKind; 12] = [
        ObjectKind::Brand,
        ObjectKind::Category,
        ObjectKind::CategoryType,
        ObjectKind::Product,
        ObjectKind::ProductBundle,
        ObjectKind::ProductType,
        ObjectKind::ProductSku,
        ObjectKind::Attribute,
        ObjectKind::SkuOption,
        ObjectKind::PromotionRule,
        ObjectKind::PriceListDescriptor,
        ObjectKind::BaseAmount,
    ];

    /// Direct supertype of this kind, if any.
    pub fn parent(self) -> Option<ObjectKind> {
        match self {
            ObjectKind::ProductBundle => Some(ObjectKind::Product),
            _ => None,
        }
    }

    /// Returns true if a value of this kind can be used where `other` is
    /// expected (the kind itself or one of its ancestors).
    pub fn is_a(self, other: ObjectKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Number of ancestors above this kind.
    pub fn depth(self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(kind) = current {
            depth += 1;
            current = kind.parent();
        }
        depth
    }

    /// Whether objects of this kind carry the standard `guid` identity.
    ///
    /// Pricing transfer objects do not.
    pub fn is_entity(self) -> bool {
        !matches!(self, ObjectKind::PriceListDescriptor | ObjectKind::BaseAmount)
    }

    /// Class-style name used as the key of the guid resolver registry.
    pub fn class_name(self) -> &'static str {
        match self {
            ObjectKind::Brand => "Brand",
            ObjectKind::Category => "Category",
            ObjectKind::CategoryType => "CategoryType",
            ObjectKind::Product => "Product",
            ObjectKind::ProductBundle => "ProductBundle",
            ObjectKind::ProductType => "ProductType",
            ObjectKind::ProductSku => "ProductSku",
            ObjectKind::Attribute => "Attribute",
            ObjectKind::SkuOption => "SkuOption",
            ObjectKind::PromotionRule => "PromotionRule",
            ObjectKind::PriceListDescriptor => "PriceListDescriptorDTO",
            ObjectKind::BaseAmount => "BaseAmountDTO",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

// =============================================================================
// CLUSTER A: CATALOG
// =============================================================================

/// A product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub guid: Guid,
    pub code: String,
    pub name: String,
}

/// Classification of a category (drives which attributes it carries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryType {
    pub guid: Guid,
    pub name: String,
}

/// A catalog category.
///
/// A linked category mirrors a master category from another catalog; it has
/// no parent or type of its own worth tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub guid: Guid,
    pub code: String,
    pub name: String,
    /// Parent category, `None` for a top-level category.
    pub parent: Option<Arc<Category>>,
    pub category_type: Option<Arc<CategoryType>>,
    /// Master category, set only for linked categories.
    pub master: Option<Arc<Category>>,
}

impl Category {
    /// Create a top-level, non-linked category.
    pub fn new(guid: impl Into<Guid>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            code: code.into(),
            name: name.into(),
            parent: None,
            category_type: None,
            master: None,
        }
    }

    pub fn with_parent(mut self, parent: Arc<Category>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_type(mut self, category_type: Arc<CategoryType>) -> Self {
        self.category_type = Some(category_type);
        self
    }

    pub fn linked_to(mut self, master: Arc<Category>) -> Self {
        self.master = Some(master);
        self
    }

    pub fn is_linked(&self) -> bool {
        self.master.is_some()
    }
}

/// A product or sku attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub guid: Guid,
    pub key: String,
    pub name: String,
}

/// A sku option (e.g. "size", "colour").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuOption {
    pub guid: Guid,
    pub option_key: String,
}

/// A concrete value of a sku option carried by a sku.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuOptionValue {
    pub value_key: String,
    pub option: Arc<SkuOption>,
}

/// A product type: the attribute groups and sku options its products use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductType {
    pub guid: Guid,
    pub name: String,
    pub product_attributes: Vec<Arc<Attribute>>,
    pub sku_attributes: Vec<Arc<Attribute>>,
    pub sku_options: Vec<Arc<SkuOption>>,
}

/// Kind of merchandising association between two products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociationType {
    CrossSell,
    UpSell,
    Accessory,
    Replacement,
}

/// An outgoing association from one product to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAssociation {
    pub association_type: AssociationType,
    pub target: Arc<Product>,
}

/// A sellable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub guid: Guid,
    pub code: String,
    pub name: String,
    pub brand: Option<Arc<Brand>>,
    pub product_type: Option<Arc<ProductType>>,
    pub categories: Vec<Arc<Category>>,
    pub associations: Vec<ProductAssociation>,
}

impl Product {
    /// Create a product with no brand, type, categories or associations.
    pub fn new(guid: impl Into<Guid>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            code: code.into(),
            name: name.into(),
            brand: None,
            product_type: None,
            categories: Vec::new(),
            associations: Vec::new(),
        }
    }

    pub fn with_brand(mut self, brand: Arc<Brand>) -> Self {
        self.brand = Some(brand);
        self
    }

    pub fn with_type(mut self, product_type: Arc<ProductType>) -> Self {
        self.product_type = Some(product_type);
        self
    }

    pub fn with_category(mut self, category: Arc<Category>) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_association(mut self, association_type: AssociationType, target: Arc<Product>) -> Self {
        self.associations.push(ProductAssociation {
            association_type,
            target,
        });
        self
    }
}

/// One entry of a bundle: either a plain product or a nested bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BundleConstituent {
    Product(Arc<Product>),
    Bundle(Arc<ProductBundle>),
}

/// A product sold as a bundle of other products.
///
/// A bundle is itself a product (`ObjectKind::ProductBundle` is a
/// `ObjectKind::Product`), exposed through `product`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBundle {
    pub product: Product,
    pub constituents: Vec<BundleConstituent>,
}

/// A stock keeping unit of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSku {
    pub guid: Guid,
    pub sku_code: String,
    pub product: Arc<Product>,
    pub option_values: Vec<SkuOptionValue>,
}

// =============================================================================
// CLUSTER B: PROMOTION
// =============================================================================

/// Key of a promotion rule parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleParameterKey {
    BrandCode,
    CategoryCode,
    ProductCode,
    SkuCode,
    DiscountAmount,
    DiscountPercent,
}

/// A single parameter of a promotion rule element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleParameter {
    pub key: RuleParameterKey,
    pub value: String,
}

impl RuleParameter {
    pub fn new(key: RuleParameterKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// A promotion rule whose conditions and actions reference catalog objects by
/// code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRule {
    pub guid: Guid,
    pub name: String,
    pub parameters: Vec<RuleParameter>,
}

// =============================================================================
// CLUSTER C: PRICING (TRANSFER OBJECTS)
// =============================================================================

/// Price list descriptor transfer object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListDescriptor {
    pub guid: String,
    pub name: String,
    pub currency_code: String,
}

/// A base amount (one price point) transfer object.
///
/// Amounts are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAmount {
    pub guid: String,
    pub price_list_descriptor_guid: String,
    pub object_type: String,
    pub object_guid: String,
    pub quantity: u32,
    pub list_value: i64,
    pub sale_value: Option<i64>,
}

// =============================================================================
// LIVE OBJECT HANDLE
// =============================================================================

/// A live catalog object of any kind.
///
/// Equality and hashing use the object's kind and identifier only, so two
/// handles to the same stored object compare equal regardless of how they
/// were loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CatalogObject {
    Brand(Arc<Brand>),
    Category(Arc<Category>),
    CategoryType(Arc<CategoryType>),
    Product(Arc<Product>),
    ProductBundle(Arc<ProductBundle>),
    ProductType(Arc<ProductType>),
    ProductSku(Arc<ProductSku>),
    Attribute(Arc<Attribute>),
    SkuOption(Arc<SkuOption>),
    PromotionRule(Arc<PromotionRule>),
    PriceListDescriptor(Arc<PriceListDescriptor>),
    BaseAmount(Arc<BaseAmount>),
}

impl CatalogObject {
    /// Runtime kind of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            CatalogObject::Brand(_) => ObjectKind::Brand,
            CatalogObject::Category(_) => ObjectKind::Category,
            CatalogObject::CategoryType(_) => ObjectKind::CategoryType,
            CatalogObject::Product(_) => ObjectKind::Product,
            CatalogObject::ProductBundle(_) => ObjectKind::ProductBundle,
            CatalogObject::ProductType(_) => ObjectKind::ProductType,
            CatalogObject::ProductSku(_) => ObjectKind::ProductSku,
            CatalogObject::Attribute(_) => ObjectKind::Attribute,
            CatalogObject::SkuOption(_) => ObjectKind::SkuOption,
            CatalogObject::PromotionRule(_) => ObjectKind::PromotionRule,
            CatalogObject::PriceListDescriptor(_) => ObjectKind::PriceListDescriptor,
            CatalogObject::BaseAmount(_) => ObjectKind::BaseAmount,
        }
    }

    /// The standard `guid` identity, `None` for transfer objects.
    pub fn entity_guid(&self) -> Option<&str> {
        match self {
            CatalogObject::Brand(o) => Some(&o.guid),
            CatalogObject::Category(o) => Some(&o.guid),
            CatalogObject::CategoryType(o) => Some(&o.guid),
            CatalogObject::Product(o) => Some(&o.guid),
            CatalogObject::ProductBundle(o) => Some(&o.product.guid),
            CatalogObject::ProductType(o) => Some(&o.guid),
            CatalogObject::ProductSku(o) => Some(&o.guid),
            CatalogObject::Attribute(o) => Some(&o.guid),
            CatalogObject::SkuOption(o) => Some(&o.guid),
            CatalogObject::PromotionRule(o) => Some(&o.guid),
            CatalogObject::PriceListDescriptor(_) | CatalogObject::BaseAmount(_) => None,
        }
    }

    /// Product view of this object: the product itself, or a bundle's
    /// product part.
    pub fn as_product(&self) -> Option<&Product> {
        match self {
            CatalogObject::Product(product) => Some(product),
            CatalogObject::ProductBundle(bundle) => Some(&bundle.product),
            _ => None,
        }
    }

    /// Kind and raw identifier used for equality.
    fn identity(&self) -> (ObjectKind, &str) {
        let id = match self {
            CatalogObject::PriceListDescriptor(o) => o.guid.as_str(),
            CatalogObject::BaseAmount(o) => o.guid.as_str(),
            other => other.entity_guid().unwrap_or_default(),
        };
        (self.kind(), id)
    }
}

impl PartialEq for CatalogObject {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for CatalogObject {}

impl Hash for CatalogObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl From<BundleConstituent> for CatalogObject {
    fn from(constituent: BundleConstituent) -> Self {
        match constituent {
            BundleConstituent::Product(product) => CatalogObject::Product(product),
            BundleConstituent::Bundle(bundle) => CatalogObject::ProductBundle(bundle),
        }
    }
}
