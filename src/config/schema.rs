//! Store settings.
//!
//! These describe how a `ConfigStore` watches and resolves, not the watched
//! INI file itself. All fields have defaults so an empty TOML file is valid.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Settings for a `ConfigStore`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    /// Name of the watched file, matched case-insensitively against events.
    pub file_name: String,

    /// Quiet period after the last relevant event before reloading.
    pub debounce_ms: u64,

    /// Poll interval for the polling watcher backend.
    pub poll_interval_secs: u64,

    /// Scope sections are named `<scope_prefix>.<scope>`.
    pub scope_prefix: String,

    /// Fallback section consulted when the scope section lacks a key.
    pub default_section: String,

    /// Buffered change notifications per subscriber before it starts lagging.
    pub notify_capacity: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            file_name: "Config.ini".to_string(),
            debounce_ms: 100,
            poll_interval_secs: 2,
            scope_prefix: "Aircraft".to_string(),
            default_section: "Default".to_string(),
            notify_capacity: 16,
        }
    }
}

impl StoreSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Section name holding overrides for `scope`.
    pub fn scope_section(&self, scope: &str) -> String {
        format!("{}.{}", self.scope_prefix, scope)
    }
}
