//! Configuration error types
//!
//! Error codes:
//! - ROWID_FILTER_CONFIG_READ
//! - ROWID_FILTER_CONFIG_PARSE
//! - ROWID_FILTER_CONFIG_INVALID

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "ROWID_FILTER_CONFIG_READ",
            ConfigError::Parse(_) => "ROWID_FILTER_CONFIG_PARSE",
            ConfigError::Invalid(_) => "ROWID_FILTER_CONFIG_INVALID",
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            ConfigError::Invalid("x".into()).code(),
            "ROWID_FILTER_CONFIG_INVALID"
        );
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ConfigError::from(parse).code(), "ROWID_FILTER_CONFIG_PARSE");
    }

    #[test]
    fn test_display() {
        let err = ConfigError::Invalid("max_rowid_filter_size must be > 0".into());
        assert!(err.to_string().contains("max_rowid_filter_size"));
    }
}
