//! Configuration for Business Object Resolution

use serde::{Deserialize, Serialize};
use shared_types::OBJECT_NAME_KEY;

/// Resolution configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Maximum nesting followed when walking bundle constituents
    pub max_bundle_depth: usize,
    /// Metadata key written by the name metadata resolvers
    pub object_name_key: String,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_bundle_depth: 16,
            object_name_key: OBJECT_NAME_KEY.to_string(),
        }
    }
}
