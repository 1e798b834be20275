//! Outbound Ports (Driven Ports / SPI)
//!
//! Lookups the resolvers need from the catalog persistence layer.

use shared_types::{Brand, CatalogObject, Category, ObjectKind, ProductSku};
use std::sync::Arc;
use thiserror::Error;

/// One result row of a named query.
pub type QueryRow = Vec<String>;

/// Named queries issued by the metadata resolvers.
///
/// Every query takes a single parameter, the object identifier, and yields
/// at most one row.
pub mod queries {
    /// Columns: name
    pub const BRAND_NAME_BY_GUID: &str = "BRAND_NAME_IN_DEFAULT_LOCALE_BY_GUID";
    /// Columns: name
    pub const CATEGORY_NAME_BY_GUID: &str = "CATEGORY_NAME_IN_DEFAULT_LOCALE_BY_GUID";
    /// Columns: name
    pub const PRODUCT_NAME_BY_GUID: &str = "PRODUCT_NAME_IN_DEFAULT_LOCALE_BY_GUID";
    /// Columns: name
    pub const PRODUCT_TYPE_NAME_BY_GUID: &str = "PRODUCT_TYPE_NAME_BY_GUID";
    /// Columns: sku code
    pub const SKU_CODE_BY_GUID: &str = "PRODUCT_SKU_CODE_BY_GUID";
    /// Columns: name
    pub const PROMOTION_NAME_BY_GUID: &str = "PROMOTION_NAME_BY_GUID";
    /// Columns: name
    pub const PRICE_LIST_NAME_BY_GUID: &str = "PRICE_LIST_NAME_BY_GUID";
    /// Columns: price list name, object guid, quantity
    pub const BASE_AMOUNT_DISPLAY_BY_GUID: &str = "BASE_AMOUNT_DISPLAY_BY_GUID";
}

/// Named query failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown named query: {0}")]
    UnknownQuery(String),

    #[error("Query {name} expects {expected} parameter(s), got {actual}")]
    BadParameters {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Query backend failure: {0}")]
    Backend(String),
}

/// Named query execution
///
/// The resolvers depend only on `query(name, params) → rows`; how the query
/// is planned and run belongs to the persistence layer.
pub trait NamedQueryService: Send + Sync {
    fn query(&self, name: &str, params: &[&str]) -> Result<Vec<QueryRow>, QueryError>;
}

/// Catalog lookup services
///
/// Used by dependency resolvers to load objects by guid (`get_object`) and
/// to resolve the codes referenced by promotion rule parameters.
pub trait CatalogLookup: Send + Sync {
    /// Find an object of `kind` (or any of its subkinds) by guid.
    fn find_by_guid(&self, kind: ObjectKind, guid: &str) -> Option<CatalogObject>;

    fn find_brand_by_code(&self, code: &str) -> Option<Arc<Brand>>;

    fn find_category_by_code(&self, code: &str) -> Option<Arc<Category>>;

    /// Products and bundles share one code space.
    fn find_product_by_code(&self, code: &str) -> Option<CatalogObject>;

    fn find_sku_by_code(&self, code: &str) -> Option<Arc<ProductSku>>;
}
