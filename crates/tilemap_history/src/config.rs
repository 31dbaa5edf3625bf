//! History configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of undo steps kept
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Errors that can occur when loading history settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings shared by both history kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Oldest entries are dropped once `past` grows beyond this
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl HistoryConfig {
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self { max_entries }
    }

    /// Parse from a TOML document; missing keys keep their defaults
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}
