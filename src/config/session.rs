//! Session configuration for rowid filters
//!
//! Loaded from a JSON file; every field has a default so `{}` is a valid
//! configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::errors::{ConfigError, ConfigResult};

/// Per-session knobs consulted by candidate gathering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Memory budget of one rowid filter in bytes (default 128KiB)
    #[serde(default = "default_max_rowid_filter_size")]
    pub max_rowid_filter_size: u64,

    /// Whether rowid filters are considered at all (default: true)
    #[serde(default = "default_rowid_filter")]
    pub rowid_filter: bool,

    /// Minimum log severity (default "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_rowid_filter_size() -> u64 {
    128 * 1024
}
fn default_rowid_filter() -> bool {
    true
}
fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rowid_filter_size: default_max_rowid_filter_size(),
            rowid_filter: default_rowid_filter(),
            log_level: default_log_level(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: SessionConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_rowid_filter_size == 0 {
            return Err(ConfigError::Invalid(
                "max_rowid_filter_size must be > 0".into(),
            ));
        }
        self.severity()?;
        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    /// Largest number of row locators a filter may hold for a table whose
    /// locators are `ref_length` bytes long.
    pub fn max_filter_rows(&self, ref_length: usize) -> u64 {
        self.max_rowid_filter_size / (ref_length.max(1) as u64)
    }
}
