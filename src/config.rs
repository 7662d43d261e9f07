//! Toolkit configuration.
//!
//! Loaded from a TOML file; every field has a default so an absent file is
//! valid. Validation runs at load time so a bad limit fails at startup, not
//! mid-request.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Runtime settings for the synchronization engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Pretty-print outbound messages (debugging aid).
    #[serde(default)]
    pub pretty_messages: bool,

    /// Upper bound on operations accepted in one inbound message.
    #[serde(default = "default_max_inbound_operations")]
    pub max_inbound_operations: usize,

    /// Keep rendering sibling widgets when one adapter fails. Disable to
    /// make adapter failures fatal while debugging.
    #[serde(default = "default_continue_on_adapter_error")]
    pub continue_on_adapter_error: bool,
}

fn default_max_inbound_operations() -> usize {
    1024
}

fn default_continue_on_adapter_error() -> bool {
    true
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            pretty_messages: false,
            max_inbound_operations: default_max_inbound_operations(),
            continue_on_adapter_error: default_continue_on_adapter_error(),
        }
    }
}

impl ToolkitConfig {
    /// Load configuration from a file.
    ///
    /// - If the file doesn't exist, returns the defaults.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_inbound_operations == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_inbound_operations must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ToolkitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_inbound_operations, 1024);
        assert!(config.continue_on_adapter_error);
        assert!(!config.pretty_messages);
    }

    #[test]
    fn zero_operation_limit_fails_validation() {
        let config = ToolkitConfig {
            max_inbound_operations: 0,
            ..ToolkitConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
