//! Configuration loader for listener services
//!
//! Expected YAML format:
//!
//! ```yaml
//! listeners:
//!   user.registered:
//!     - mailer.welcome
//!     - audit.logger
//!   order.paid:
//!     - invoice.generator
//! ```
//!
//! Each entry maps an event name to the ids of the services that listen to
//! it, in invocation order.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dispatcher::EventDispatcher;
use crate::error::{EventsError, Result};
use crate::types::ListenerRegistration;

/// Event name to listener service ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerConfig {
    #[serde(default)]
    pub listeners: BTreeMap<String, Vec<String>>,
}

impl ListenerConfig {
    /// Total number of service registrations declared
    pub fn registration_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Check that no event name or service id is blank
    pub fn validate(&self) -> Result<()> {
        for (event, services) in &self.listeners {
            if event.trim().is_empty() {
                return Err(EventsError::InvalidConfiguration(
                    "Event name cannot be empty".to_string(),
                ));
            }
            if services.iter().any(|id| id.trim().is_empty()) {
                return Err(EventsError::InvalidConfiguration(format!(
                    "Listener service id cannot be empty (event '{}')",
                    event
                )));
            }
        }
        Ok(())
    }

    /// Register every declared service with `dispatcher`
    ///
    /// Events are applied in name order and each event's services in the
    /// listed order. Returns the number of registrations made.
    pub fn apply(&self, dispatcher: &dyn EventDispatcher) -> Result<usize> {
        self.validate()?;

        let mut applied = 0;
        for (event, services) in &self.listeners {
            for service_id in services {
                dispatcher.add_listener(event, ListenerRegistration::service(service_id.as_str()))?;
                applied += 1;
            }
        }

        info!(
            events = self.listeners.len(),
            registrations = applied,
            "Applied listener configuration"
        );
        Ok(applied)
    }
}

/// Configuration loader for listener services
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load listener configuration from a specific file path
    ///
    /// A missing file yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or contains
    /// invalid YAML or invalid listener declarations.
    pub fn load_from_path(path: &Path) -> Result<ListenerConfig> {
        if !path.exists() {
            debug!(path = %path.display(), "Listener configuration not found, using empty configuration");
            return Ok(ListenerConfig::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| EventsError::StorageError(format!("Failed to read config file: {}", e)))?;

        Self::parse_yaml(&content)
    }

    /// Parse and validate YAML configuration content
    pub fn parse_yaml(content: &str) -> Result<ListenerConfig> {
        // An empty document deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(ListenerConfig::default());
        }

        let config: ListenerConfig = serde_yaml::from_str(content)
            .map_err(|e| EventsError::InvalidConfiguration(format!("Invalid YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Write listener configuration to `path` as YAML
    pub fn save_to_path(config: &ListenerConfig, path: &Path) -> Result<()> {
        config.validate()?;
        let content = serde_yaml::to_string(config)?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "Saved listener configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_yaml_with_listeners() {
        let yaml = r#"
listeners:
  user.registered:
    - mailer.welcome
    - audit.logger
  order.paid:
    - invoice.generator
"#;

        let config = ConfigLoader::parse_yaml(yaml).expect("Should parse YAML");
        assert_eq!(config.listeners.len(), 2);
        assert_eq!(
            config.listeners["user.registered"],
            vec!["mailer.welcome", "audit.logger"]
        );
        assert_eq!(config.registration_count(), 3);
    }

    #[test]
    fn test_parse_yaml_empty() {
        assert_eq!(ConfigLoader::parse_yaml("").unwrap().registration_count(), 0);
        assert_eq!(
            ConfigLoader::parse_yaml("listeners: {}").unwrap(),
            ListenerConfig::default()
        );
    }

    #[test]
    fn test_parse_yaml_invalid() {
        let result = ConfigLoader::parse_yaml("listeners: [unclosed");
        assert!(matches!(result, Err(EventsError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_parse_yaml_wrong_shape() {
        let yaml = r#"
listeners:
  user.registered: mailer.welcome
"#;
        assert!(ConfigLoader::parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_blank_service_id_rejected() {
        let yaml = r#"
listeners:
  user.registered:
    - "  "
"#;
        match ConfigLoader::parse_yaml(yaml) {
            Err(EventsError::InvalidConfiguration(msg)) => assert!(msg.contains("user.registered")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let path = PathBuf::from("/nonexistent/path/listeners.yaml");
        let config = ConfigLoader::load_from_path(&path).expect("Should return empty config");
        assert_eq!(config.registration_count(), 0);
    }
}
