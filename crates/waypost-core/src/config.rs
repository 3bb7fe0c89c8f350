//! Waypost configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use waypost_history::MemoryHostOptions;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entry the in-memory host starts on
    pub initial_url: String,
    /// Cap on in-memory history entries, unbounded when unset
    pub max_entries: Option<usize>,
    /// Apply back/forward immediately instead of queueing them
    pub immediate_traversal: bool,
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            initial_url: "/".to_string(),
            max_entries: None,
            immediate_traversal: false,
            log_filter: "info".to_string(),
        }
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_url.trim().is_empty() {
            return Err(CoreError::Config("initial_url must not be empty".to_string()));
        }
        if self.max_entries == Some(0) {
            return Err(CoreError::Config(
                "max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn memory_host_options(&self) -> MemoryHostOptions {
        MemoryHostOptions {
            max_entries: self.max_entries,
            immediate_traversal: self.immediate_traversal,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
