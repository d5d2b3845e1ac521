//! Column-name configuration.
//!
//! Column names are configuration, not protocol: sources exported by
//! different vendors label the date and close columns differently. Defaults
//! match the common broker-export spelling (`Date` / `Close`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Column mapping for the tabular source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConvertConfig {
    /// Header name of the calendar-date column.
    pub date_column: String,

    /// Header name of the closing-price column.
    pub close_column: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            date_column: "Date".into(),
            close_column: "Close".into(),
        }
    }
}

impl ConvertConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns_match_broker_exports() {
        let config = ConvertConfig::default();
        assert_eq!(config.date_column, "Date");
        assert_eq!(config.close_column, "Close");
    }

    #[test]
    fn parses_full_toml() {
        let config = ConvertConfig::from_toml(
            r#"
date_column = "timestamp"
close_column = "adj_close"
"#,
        )
        .unwrap();
        assert_eq!(config.date_column, "timestamp");
        assert_eq!(config.close_column, "adj_close");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = ConvertConfig::from_toml("close_column = \"Last\"").unwrap();
        assert_eq!(config.date_column, "Date");
        assert_eq!(config.close_column, "Last");
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ConvertConfig::from_toml("date_column = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ConvertConfig::from_file(Path::new("/nonexistent/mifgen.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = ConvertConfig {
            date_column: "dt".into(),
            close_column: "px".into(),
        };
        let toml_str = toml::to_string(&config).unwrap();
        let deser = ConvertConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, deser);
    }
}
