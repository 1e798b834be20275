//! # Business Object Descriptor
//!
//! A `type` + `identifier` pair naming a domain object independently of its
//! runtime shape. Change set membership is always recorded by descriptor.

use crate::errors::DescriptorError;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Display metadata attached to a change set member.
pub type Metadata = BTreeMap<String, String>;

/// Descriptors in first-seen order, without duplicates.
pub type DescriptorSet = IndexSet<BusinessObjectDescriptor>;

/// Metadata key holding the human-readable object name.
pub const OBJECT_NAME_KEY: &str = "objectName";

/// Object type strings written into descriptors.
pub mod object_types {
    pub const BRAND: &str = "Brand";
    pub const CATEGORY: &str = "Category";
    pub const CATEGORY_TYPE: &str = "Category Type";
    pub const PRODUCT: &str = "Product";
    pub const PRODUCT_BUNDLE: &str = "Product Bundle";
    pub const PRODUCT_TYPE: &str = "Product Type";
    pub const PRODUCT_SKU: &str = "Product SKU";
    pub const ATTRIBUTE: &str = "Attribute";
    pub const SKU_OPTION: &str = "SKU Option";
    pub const PROMOTION: &str = "Promotion";
    pub const PRICE_LIST: &str = "Price List Descriptor";
    pub const PRICE: &str = "Price";
}

/// Names a business object by type and identifier.
///
/// Two descriptors are equal iff both fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusinessObjectDescriptor {
    pub object_type: String,
    pub object_identifier: String,
}

impl BusinessObjectDescriptor {
    pub fn new(object_type: impl Into<String>, object_identifier: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_identifier: object_identifier.into(),
        }
    }

    /// Check that both parts are present.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.object_type.trim().is_empty() {
            return Err(DescriptorError::MissingType);
        }
        if self.object_identifier.trim().is_empty() {
            return Err(DescriptorError::MissingIdentifier {
                object_type: self.object_type.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for BusinessObjectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.object_type, self.object_identifier)
    }
}
