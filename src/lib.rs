//! Portable filesystem facade for desktop editor shells.
//!
//! The shell creates one [`AppState`] at start-up and hands it to every consumer
//! (project tree, document manager, dialogs). All disk access goes through
//! [`filesystem::FileSystem`].

pub mod filesystem;
pub mod logging;
pub mod preferences;

use std::path::PathBuf;
use std::sync::Arc;

use crate::filesystem::dialog::DialogHost;
use crate::filesystem::host::NativeHost;
use crate::filesystem::{FileSystem, FsConfig};
use crate::preferences::{PreferencesError, PreferencesStore};

pub use crate::filesystem::{ErrorKind, FsError, FsResult};

pub struct AppState {
    pub fs: FileSystem,
    pub preferences: tokio::sync::Mutex<PreferencesStore>,
}

impl AppState {
    pub fn new(fs: FileSystem, preferences: PreferencesStore) -> Self {
        Self {
            fs,
            preferences: tokio::sync::Mutex::new(preferences),
        }
    }

    /// Load preferences from `prefs_path` and build a native facade configured from them
    pub fn initialize(
        prefs_path: impl Into<PathBuf>,
        dialogs: Arc<dyn DialogHost>,
    ) -> Result<Self, PreferencesError> {
        let preferences = PreferencesStore::load(prefs_path)?;
        let config = FsConfig::from_preferences(&preferences)?;

        tracing::info!(
            prefs = %preferences.path().display(),
            batch_window_ms = config.batch_window_ms,
            "filesystem facade initialised"
        );

        let fs = FileSystem::new(Arc::new(NativeHost::new()), dialogs, config);
        Ok(Self::new(fs, preferences))
    }
}
