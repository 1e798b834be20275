//! Type registry: object kind ↔ object type string.
//!
//! Two tables:
//! - the primary table of ranked entity registrations, searched by
//!   assignability (most specific registration wins);
//! - the transfer-object table, matched on the exact kind only.
//!
//! Ranks replace live type introspection. A registration that specialises
//! another registered kind must declare a higher rank; the builder rejects
//! tables that break this rule, so ordering by rank always places a subtype
//! before its supertype. Order among unrelated kinds follows rank and then
//! registration order, and callers must not depend on it.

use crate::error::{RegistryError, RegistryResult};
use shared_types::{object_types, BusinessObjectDescriptor, ObjectKind};
use std::collections::{HashMap, HashSet};

/// One entry of the primary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistration {
    pub kind: ObjectKind,
    pub object_type: String,
    /// Specificity; higher ranks are tried first.
    pub rank: u8,
}

/// Builder for [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    primary: Vec<TypeRegistration>,
    transfer_objects: Vec<(ObjectKind, String)>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity kind under `object_type` with specificity `rank`.
    pub fn register(mut self, kind: ObjectKind, object_type: impl Into<String>, rank: u8) -> Self {
        self.primary.push(TypeRegistration {
            kind,
            object_type: object_type.into(),
            rank,
        });
        self
    }

    /// Register a transfer object kind, matched on its exact kind.
    pub fn register_transfer_object(mut self, kind: ObjectKind, object_type: impl Into<String>) -> Self {
        self.transfer_objects.push((kind, object_type.into()));
        self
    }

    pub fn build(self) -> RegistryResult<TypeRegistry> {
        let mut kinds = HashSet::new();
        let mut object_type_names = HashSet::new();

        for reg in &self.primary {
            if !kinds.insert(reg.kind) {
                return Err(RegistryError::DuplicateKind { kind: reg.kind });
            }
            if !object_type_names.insert(reg.object_type.clone()) {
                return Err(RegistryError::DuplicateObjectType {
                    object_type: reg.object_type.clone(),
                });
            }
        }

        for (kind, object_type) in &self.transfer_objects {
            if kind.is_entity() {
                return Err(RegistryError::NotATransferObject { kind: *kind });
            }
            if !kinds.insert(*kind) {
                return Err(RegistryError::DuplicateKind { kind: *kind });
            }
            if !object_type_names.insert(object_type.clone()) {
                return Err(RegistryError::DuplicateObjectType {
                    object_type: object_type.clone(),
                });
            }
        }

        for sub in &self.primary {
            for sup in &self.primary {
                if sub.kind != sup.kind && sub.kind.is_a(sup.kind) && sub.rank <= sup.rank {
                    return Err(RegistryError::RankInversion {
                        subtype: sub.kind,
                        subtype_rank: sub.rank,
                        supertype: sup.kind,
                        supertype_rank: sup.rank,
                    });
                }
            }
        }

        let mut primary = self.primary;
        // Stable: equal ranks keep registration order
        primary.sort_by(|a, b| b.rank.cmp(&a.rank));

        let ranks = primary.iter().map(|r| (r.kind, r.rank)).collect();
        let primary_by_type = primary
            .iter()
            .map(|r| (r.object_type.clone(), r.kind))
            .collect();
        let transfer_by_type = self
            .transfer_objects
            .iter()
            .map(|(kind, object_type)| (object_type.clone(), *kind))
            .collect();
        let transfer_objects = self.transfer_objects.into_iter().collect();

        Ok(TypeRegistry {
            primary,
            ranks,
            primary_by_type,
            transfer_objects,
            transfer_by_type,
        })
    }
}

/// Immutable kind ↔ object type tables.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    /// Sorted subclass-first.
    primary: Vec<TypeRegistration>,
    ranks: HashMap<ObjectKind, u8>,
    primary_by_type: HashMap<String, ObjectKind>,
    transfer_objects: HashMap<ObjectKind, String>,
    transfer_by_type: HashMap<String, ObjectKind>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// The standard catalog, pricing and promotion table.
    pub fn catalog_defaults() -> RegistryResult<Self> {
        Self::builder()
            .register(ObjectKind::Brand, object_types::BRAND, 10)
            .register(ObjectKind::Category, object_types::CATEGORY, 10)
            .register(ObjectKind::CategoryType, object_types::CATEGORY_TYPE, 10)
            .register(ObjectKind::Product, object_types::PRODUCT, 10)
            .register(ObjectKind::ProductBundle, object_types::PRODUCT_BUNDLE, 20)
            .register(ObjectKind::ProductType, object_types::PRODUCT_TYPE, 10)
            .register(ObjectKind::ProductSku, object_types::PRODUCT_SKU, 10)
            .register(ObjectKind::Attribute, object_types::ATTRIBUTE, 10)
            .register(ObjectKind::SkuOption, object_types::SKU_OPTION, 10)
            .register(ObjectKind::PromotionRule, object_types::PROMOTION, 10)
            .register_transfer_object(ObjectKind::PriceListDescriptor, object_types::PRICE_LIST)
            .register_transfer_object(ObjectKind::BaseAmount, object_types::PRICE)
            .build()
    }

    /// Most specific primary registration `kind` is assignable to.
    pub fn most_specific(&self, kind: ObjectKind) -> Option<&TypeRegistration> {
        self.primary.iter().find(|reg| kind.is_a(reg.kind))
    }

    /// Object type of a transfer object kind (exact match).
    pub fn transfer_object_type(&self, kind: ObjectKind) -> Option<&str> {
        self.transfer_objects.get(&kind).map(String::as_str)
    }

    /// Reverse lookup: primary table first, then transfer objects.
    pub fn kind_of(&self, object_type: &str) -> Option<ObjectKind> {
        self.primary_by_type
            .get(object_type)
            .or_else(|| self.transfer_by_type.get(object_type))
            .copied()
    }

    /// Kind registered in the primary table under `object_type`.
    pub fn primary_kind_of(&self, object_type: &str) -> Option<ObjectKind> {
        self.primary_by_type.get(object_type).copied()
    }

    /// Primary registrations, subclass-first.
    pub fn registrations(&self) -> &[TypeRegistration] {
        &self.primary
    }

    /// Order `kinds` so that every subtype precedes its supertypes.
    ///
    /// Unregistered kinds borrow the rank of their nearest registered
    /// ancestor; depth breaks that tie. Duplicates are dropped.
    pub fn sub_class_first(&self, kinds: impl IntoIterator<Item = ObjectKind>) -> Vec<ObjectKind> {
        let mut seen = HashSet::new();
        let mut ordered: Vec<ObjectKind> = kinds.into_iter().filter(|k| seen.insert(*k)).collect();
        ordered.sort_by_key(|kind| std::cmp::Reverse((self.effective_rank(*kind), kind.depth())));
        ordered
    }

    fn effective_rank(&self, kind: ObjectKind) -> u8 {
        let mut current = Some(kind);
        while let Some(k) = current {
            if let Some(rank) = self.ranks.get(&k) {
                return *rank;
            }
            current = k.parent();
        }
        0
    }

    /// Kind named by a descriptor, if its type is registered.
    pub fn kind_of_descriptor(&self, descriptor: &BusinessObjectDescriptor) -> Option<ObjectKind> {
        self.kind_of(&descriptor.object_type)
    }
}
