//! # Configuration
//!
//! Record-wide defaults are managed by [`confique`], which layers sources in
//! priority order:
//! 1. **Environment variables**: `VDATA_PRIMARY_KEY`, `VDATA_ATTRIBUTE_POSTFIX`.
//! 2. **TOML file**: passed explicitly to [`RecordConfig::load`].
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! A [`Schema`](crate::schema::Schema) override always wins over all three.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `primary_key` | `id` | Attribute returned by `Record::id` |
//! | `attribute_postfix` | `_view` | Suffix naming an attribute's shadow value |

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Defaults applied to every record that does not override them.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    /// Name of the primary key attribute.
    #[config(default = "id", env = "VDATA_PRIMARY_KEY")]
    pub primary_key: String,

    /// Suffix that names an attribute's shadow ("status" -> "status_view").
    #[config(default = "_view", env = "VDATA_ATTRIBUTE_POSTFIX")]
    pub attribute_postfix: String,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            primary_key: "id".to_string(),
            attribute_postfix: "_view".to_string(),
        }
    }
}

impl RecordConfig {
    /// Load from the environment, then `path` (if any), then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RecordConfig::default();
        assert_eq!(config.primary_key, "id");
        assert_eq!(config.attribute_postfix, "_view");
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vdata.toml");
        fs::write(&path, "primary_key = \"uuid\"\n").unwrap();

        let config = RecordConfig::load(Some(&path)).unwrap();
        assert_eq!(config.primary_key, "uuid");
        assert_eq!(config.attribute_postfix, "_view");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let config = RecordConfig::load(Some(&path)).unwrap();
        assert_eq!(config, RecordConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vdata.toml");
        fs::write(&path, "primary_key = [unclosed").unwrap();

        let err = RecordConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, crate::error::DataError::Config(_)));
    }

    #[test]
    fn test_serializes_back_to_toml() {
        let config = RecordConfig {
            primary_key: "sku".to_string(),
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: RecordConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
