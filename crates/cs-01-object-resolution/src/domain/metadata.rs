//! Metadata resolvers
//!
//! Produce display metadata (at least the object name) for a descriptor with
//! a single named lookup keyed by the object identifier.

use crate::config::ResolutionConfig;
use crate::ports::outbound::{queries, NamedQueryService, QueryError};
use shared_types::{object_types, BusinessObjectDescriptor, Metadata};
use std::sync::Arc;
use tracing::debug;

/// Metadata key holding the price list name of a price.
pub const PRICE_LIST_NAME_KEY: &str = "priceListName";

/// Strategy producing display metadata for one or a few object types.
pub trait MetadataResolver: Send + Sync {
    /// Whether this resolver handles `object_type`. False for an empty type.
    fn is_valid_resolver_for_object_type(&self, object_type: &str) -> bool;

    /// Metadata of the described object, empty when the lookup finds
    /// nothing.
    fn resolve_meta_data(&self, descriptor: &BusinessObjectDescriptor) -> Result<Metadata, QueryError>;
}

/// Resolver writing the first column of a one-parameter named query under
/// the object name key.
pub struct NamedQueryMetadataResolver {
    object_types: Vec<&'static str>,
    query_name: &'static str,
    name_key: String,
    queries: Arc<dyn NamedQueryService>,
}

impl NamedQueryMetadataResolver {
    pub fn new(
        object_types: Vec<&'static str>,
        query_name: &'static str,
        name_key: impl Into<String>,
        queries: Arc<dyn NamedQueryService>,
    ) -> Self {
        Self {
            object_types,
            query_name,
            name_key: name_key.into(),
            queries,
        }
    }

    /// Products and bundles share one name lookup.
    pub fn product(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(
            vec![object_types::PRODUCT, object_types::PRODUCT_BUNDLE],
            queries::PRODUCT_NAME_BY_GUID,
            &config.object_name_key,
            queries,
        )
    }

    pub fn category(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(
            vec![object_types::CATEGORY],
            queries::CATEGORY_NAME_BY_GUID,
            &config.object_name_key,
            queries,
        )
    }

    pub fn brand(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(
            vec![object_types::BRAND],
            queries::BRAND_NAME_BY_GUID,
            &config.object_name_key,
            queries,
        )
    }

    /// Skus are displayed by their code.
    pub fn sku(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(
            vec![object_types::PRODUCT_SKU],
            queries::SKU_CODE_BY_GUID,
            &config.object_name_key,
            queries,
        )
    }

    pub fn product_type(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(
            vec![object_types::PRODUCT_TYPE],
            queries::PRODUCT_TYPE_NAME_BY_GUID,
            &config.object_name_key,
            queries,
        )
    }

    pub fn promotion(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(
            vec![object_types::PROMOTION],
            queries::PROMOTION_NAME_BY_GUID,
            &config.object_name_key,
            queries,
        )
    }

    pub fn price_list(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(
            vec![object_types::PRICE_LIST],
            queries::PRICE_LIST_NAME_BY_GUID,
            &config.object_name_key,
            queries,
        )
    }
}

impl MetadataResolver for NamedQueryMetadataResolver {
    fn is_valid_resolver_for_object_type(&self, object_type: &str) -> bool {
        !object_type.is_empty() && self.object_types.iter().any(|t| *t == object_type)
    }

    fn resolve_meta_data(&self, descriptor: &BusinessObjectDescriptor) -> Result<Metadata, QueryError> {
        let rows = self
            .queries
            .query(self.query_name, &[descriptor.object_identifier.as_str()])?;

        let mut metadata = Metadata::new();
        match rows.first().and_then(|row| row.first()) {
            Some(name) => {
                metadata.insert(self.name_key.clone(), name.clone());
            }
            None => debug!(
                object_type = %descriptor.object_type,
                object_identifier = %descriptor.object_identifier,
                query = self.query_name,
                "No metadata found"
            ),
        }
        Ok(metadata)
    }
}

/// Price metadata: a readable price label plus the owning price list name.
pub struct PriceMetadataResolver {
    name_key: String,
    queries: Arc<dyn NamedQueryService>,
}

impl PriceMetadataResolver {
    pub fn new(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self {
            name_key: config.object_name_key.clone(),
            queries,
        }
    }
}

impl MetadataResolver for PriceMetadataResolver {
    fn is_valid_resolver_for_object_type(&self, object_type: &str) -> bool {
        object_type == object_types::PRICE
    }

    fn resolve_meta_data(&self, descriptor: &BusinessObjectDescriptor) -> Result<Metadata, QueryError> {
        let rows = self.queries.query(
            queries::BASE_AMOUNT_DISPLAY_BY_GUID,
            &[descriptor.object_identifier.as_str()],
        )?;

        let mut metadata = Metadata::new();
        if let Some([price_list, object_guid, quantity, ..]) = rows.first().map(Vec::as_slice) {
            metadata.insert(
                self.name_key.clone(),
                format!("{object_guid} (qty {quantity})"),
            );
            metadata.insert(PRICE_LIST_NAME_KEY.to_string(), price_list.clone());
        }
        Ok(metadata)
    }
}

/// Metadata resolvers in registration order.
#[derive(Clone, Default)]
pub struct MetadataResolverRegistry {
    resolvers: Vec<Arc<dyn MetadataResolver>>,
}

impl MetadataResolverRegistry {
    pub fn new(resolvers: Vec<Arc<dyn MetadataResolver>>) -> Self {
        Self { resolvers }
    }

    /// Name resolvers for every catalog, promotion and pricing type.
    pub fn catalog_defaults(queries: Arc<dyn NamedQueryService>, config: &ResolutionConfig) -> Self {
        Self::new(vec![
            Arc::new(NamedQueryMetadataResolver::brand(queries.clone(), config)),
            Arc::new(NamedQueryMetadataResolver::category(queries.clone(), config)),
            Arc::new(NamedQueryMetadataResolver::product(queries.clone(), config)),
            Arc::new(NamedQueryMetadataResolver::product_type(queries.clone(), config)),
            Arc::new(NamedQueryMetadataResolver::sku(queries.clone(), config)),
            Arc::new(NamedQueryMetadataResolver::promotion(queries.clone(), config)),
            Arc::new(NamedQueryMetadataResolver::price_list(queries.clone(), config)),
            Arc::new(PriceMetadataResolver::new(queries, config)),
        ])
    }

    /// Resolvers valid for `object_type`, in registration order.
    pub fn applicable<'a>(
        &'a self,
        object_type: &'a str,
    ) -> impl Iterator<Item = &'a Arc<dyn MetadataResolver>> + 'a {
        self.resolvers
            .iter()
            .filter(move |r| r.is_valid_resolver_for_object_type(object_type))
    }

    /// Merge the metadata of every applicable resolver. Later resolvers
    /// overwrite keys written by earlier ones.
    pub fn resolve_meta_data(&self, descriptor: &BusinessObjectDescriptor) -> Result<Metadata, QueryError> {
        let mut merged = Metadata::new();
        for resolver in self.applicable(&descriptor.object_type) {
            merged.extend(resolver.resolve_meta_data(descriptor)?);
        }
        Ok(merged)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
