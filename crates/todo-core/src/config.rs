//! App Configuration
//!
//! JSON-deserializable settings. Every field has a default so a partial
//! (or empty) document is valid.

use serde::{Deserialize, Serialize};

use crate::session::{ELEVATED_ROLE, USER_ROLE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub attack: AttackConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Rest,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub base_url: String,
    pub application: String,
    pub collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Rest,
            base_url: "http://localhost:8080".to_string(),
            application: "todomvc".to_string(),
            collection: "todos".to_string(),
        }
    }
}

impl StorageConfig {
    /// `{base_url}/{application}/storage/{collection}`
    pub fn collection_url(&self) -> String {
        format!(
            "{}/{}/storage/{}",
            self.base_url.trim_end_matches('/'),
            self.application.trim_matches('/'),
            self.collection.trim_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Role that may see every owner's tasks
    pub elevated_role: String,
    pub user_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            elevated_role: ELEVATED_ROLE.to_string(),
            user_role: USER_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Expose the attack simulation tools
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.backend, StorageBackend::Rest);
        assert_eq!(config.auth.elevated_role, "admin");
        assert!(!config.attack.enabled);
    }

    #[test]
    fn test_partial_document() {
        let config = AppConfig::from_json(
            r#"{"storage": {"backend": "memory", "collection": "chores"}, "attack": {"enabled": true}}"#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.collection, "chores");
        assert_eq!(config.storage.application, "todomvc");
        assert!(config.attack.enabled);
    }

    #[test]
    fn test_collection_url_trims_slashes() {
        let storage = StorageConfig {
            base_url: "https://example.test/".to_string(),
            ..StorageConfig::default()
        };
        assert_eq!(storage.collection_url(), "https://example.test/todomvc/storage/todos");
    }

    #[test]
    fn test_malformed_document() {
        let err = AppConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
