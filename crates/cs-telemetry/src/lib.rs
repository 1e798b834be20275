//! # Change Set Telemetry
//!
//! Structured logging setup for the change set engine.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cs_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CS_SERVICE_NAME` | `catalog-change-sets` | Service name in log lines |
//! | `CS_LOG_LEVEL` / `RUST_LOG` | `info` | `EnvFilter` directive |
//! | `CS_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `CS_LOG_ANSI` | `true` | ANSI colours in plain output |

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod logging;
mod tracing_setup;

pub use config::{parse_flag, TelemetryConfig};
pub use tracing_setup::env_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Telemetry already initialized")]
    AlreadyInitialized,

    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },
}

/// Install the global log subscriber.
///
/// Succeeds once per process; later calls return
/// [`TelemetryError::AlreadyInitialized`].
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}

/// Held for the lifetime of the application.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
