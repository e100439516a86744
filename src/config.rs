//! StoreConfig - storage key layout for a [`StudyStore`](crate::StudyStore).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Key holding the JSON array of every study set.
pub const DEFAULT_COLLECTION_KEY: &str = "lang_app_sets";

/// Key holding the id of the active study set.
pub const DEFAULT_ACTIVE_KEY: &str = "lang_app_active_set_id";

/// Names of the two keys the store reads and writes.
///
/// ```toml
/// collection_key = "lang_app_sets"
/// active_key = "lang_app_active_set_id"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub collection_key: String,
    pub active_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            active_key: DEFAULT_ACTIVE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Both keys must be non-empty and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection_key.trim().is_empty() {
            return Err(ConfigError::Invalid("collection_key is empty".into()));
        }
        if self.active_key.trim().is_empty() {
            return Err(ConfigError::Invalid("active_key is empty".into()));
        }
        if self.collection_key == self.active_key {
            return Err(ConfigError::Invalid(format!(
                "collection_key and active_key are both {:?}",
                self.active_key
            )));
        }
        Ok(())
    }
}
