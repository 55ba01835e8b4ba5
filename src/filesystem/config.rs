// src/filesystem/config.rs

use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::filesystem::path::DEFAULT_EXCLUSIONS;
use crate::preferences::{PreferencesError, PreferencesStore};

/// Preferences key holding the facade's settings
pub const PREFERENCES_KEY: &str = "fileSystem";

/// Quiet window of the change batcher
pub const DEFAULT_BATCH_WINDOW_MS: u64 = 200;

/// rwxr-xr-x
pub const DEFAULT_DIR_MODE: u32 = 0o755;

pub const DEFAULT_ENCODING: &str = "utf8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FsConfig {
    pub batch_window_ms: u64,
    pub default_dir_mode: u32,
    pub default_encoding: String,
    /// Prefixes treated as network drives in addition to UNC shares
    pub network_path_prefixes: Vec<String>,
    /// Replaces the built-in exclusion pattern used by `should_show`
    pub exclusions: Option<String>,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            batch_window_ms: DEFAULT_BATCH_WINDOW_MS,
            default_dir_mode: DEFAULT_DIR_MODE,
            default_encoding: DEFAULT_ENCODING.to_string(),
            network_path_prefixes: Vec::new(),
            exclusions: None,
        }
    }
}

impl FsConfig {
    /// Read the `fileSystem` section; missing section or keys take defaults
    pub fn from_preferences(prefs: &PreferencesStore) -> Result<Self, PreferencesError> {
        Ok(prefs.get_as::<FsConfig>(PREFERENCES_KEY)?.unwrap_or_default())
    }

    pub fn batch_window(&self) -> Duration {
        Duration::from_millis(self.batch_window_ms)
    }

    /// Compiled exclusion pattern. An invalid custom pattern falls back to the default.
    pub fn exclusion_regex(&self) -> Regex {
        match &self.exclusions {
            Some(pattern) => Regex::new(pattern).unwrap_or_else(|e| {
                tracing::warn!(%pattern, error = %e, "invalid exclusion pattern, using default");
                DEFAULT_EXCLUSIONS.clone()
            }),
            None => DEFAULT_EXCLUSIONS.clone(),
        }
    }
}
