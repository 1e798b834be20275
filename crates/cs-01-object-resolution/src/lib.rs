//! # CS-01: Business Object Resolution
//!
//! Maps live catalog objects to `BusinessObjectDescriptor`s and back, and
//! computes the set of other objects an edit implicitly depends on.
//!
//! ## Architecture
//!
//! - **Domain**: Type registry (kind → object type, subclass-first ranks),
//!   guid resolvers, dependency resolvers, metadata resolvers
//! - **Ports**: Outbound `CatalogLookup` and `NamedQueryService`
//! - **Service**: `BusinessObjectResolver`
//! - **Adapters**: `InMemoryCatalog` (implements both outbound ports)
//!
//! ## Registries
//!
//! All registries are composed explicitly at construction time and are
//! read-only afterwards:
//!
//! | Registry | Key | Strategy |
//! |----------|-----|----------|
//! | `TypeRegistry` | `ObjectKind` (ranked) | object type string |
//! | `GuidResolverRegistry` | `ObjectKind` | `GuidResolver` |
//! | `DependencyResolverRegistry` | `ObjectKind` (all ancestors) | ordered `DependencyResolver`s |
//! | `MetadataResolverRegistry` | object type string | ordered `MetadataResolver`s |
//!
//! ## Subclass-First Resolution
//!
//! ```text
//! ProductBundle (rank 20) ──is_a──→ Product (rank 10)
//!
//! resolve(bundle) → first registration in rank order the bundle is_a
//!                 → "Product Bundle"
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::InMemoryCatalog;
pub use config::ResolutionConfig;
pub use domain::dependency::{
    CategoryDependencyResolver, CategoryTypeDependencyResolver, DependencyResolver,
    DependencyResolverRegistry, PriceDependencyResolver, ProductBundleDependencyResolver,
    ProductDependencyResolver, ProductSkuDependencyResolver, ProductTypeDependencyResolver,
    PromotionRuleDependencyResolver,
};
pub use domain::guid::{
    BaseAmountGuidResolver, EntityGuidResolver, GuidResolver, GuidResolverRegistry,
    PriceListDescriptorGuidResolver,
};
pub use domain::metadata::{
    MetadataResolver, MetadataResolverRegistry, NamedQueryMetadataResolver, PriceMetadataResolver,
    PRICE_LIST_NAME_KEY,
};
pub use domain::registry::{TypeRegistration, TypeRegistry, TypeRegistryBuilder};
pub use error::{RegistryError, RegistryResult};
pub use ports::outbound::{queries, CatalogLookup, NamedQueryService, QueryError, QueryRow};
pub use service::BusinessObjectResolver;
