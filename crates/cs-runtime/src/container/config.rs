//! # Runtime Configuration
//!
//! Unified configuration for the resolver registries, the change set
//! services and logging.
//!
//! All values have defaults; environment variables override them.

use cs_01_object_resolution::ResolutionConfig;
use cs_02_change_sets::ChangeSetConfig;
use cs_telemetry::{parse_flag, TelemetryConfig};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Resolver registry configuration.
    pub resolution: ResolutionConfig,
    /// Change set service configuration.
    pub change_sets: ChangeSetConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    NotANumber { var: &'static str, value: String },

    #[error("max_bundle_depth must be at least 1")]
    ZeroBundleDepth,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CS_MAX_BUNDLE_DEPTH`: Bundle recursion limit (default: 16)
    /// - `CS_RESOLVE_METADATA_ON_ADD`: Resolve metadata on add when the
    ///   caller does not say (default: false)
    /// - `CS_STRICT_EVENT_DELIVERY`: Fail publishes nobody receives
    ///   (default: false)
    /// - everything [`TelemetryConfig::from_env`] reads
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable
    /// source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(value) = lookup("CS_MAX_BUNDLE_DEPTH") {
            config.resolution.max_bundle_depth =
                value.trim().parse().map_err(|_| ConfigError::NotANumber {
                    var: "CS_MAX_BUNDLE_DEPTH",
                    value,
                })?;
        }
        if let Some(value) = lookup("CS_RESOLVE_METADATA_ON_ADD") {
            config.change_sets.resolve_metadata_on_add = parse_flag(&value);
        }
        if let Some(value) = lookup("CS_STRICT_EVENT_DELIVERY") {
            config.change_sets.strict_event_delivery = parse_flag(&value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the services cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution.max_bundle_depth == 0 {
            return Err(ConfigError::ZeroBundleDepth);
        }
        Ok(())
    }
}
