//! Configuration for the change set services

use serde::{Deserialize, Serialize};

/// Change set service configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChangeSetConfig {
    /// Resolve display metadata when a caller adds an object without saying
    /// whether to
    pub resolve_metadata_on_add: bool,
    /// Fail a publish when no subscriber is listening
    pub strict_event_delivery: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChangeSetConfig::default();
        assert!(!config.resolve_metadata_on_add);
        assert!(!config.strict_event_delivery);
    }

    #[test]
    fn test_from_json() {
        let config: ChangeSetConfig = serde_json::from_str(
            r#"{"resolve_metadata_on_add":true,"strict_event_delivery":true}"#,
        )
        .unwrap();
        assert!(config.resolve_metadata_on_add);
        assert!(config.strict_event_delivery);
    }
}
