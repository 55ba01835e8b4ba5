// src/filesystem/dialog.rs
//!
//! Native file pickers
//!
//! Cancellation is a normal outcome: an empty selection or `None`, never an error.
//!

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::filesystem::types::{OpenDialogOptions, SaveDialogOptions};

#[async_trait]
pub trait DialogHost: Send + Sync {
    /// Selected entries, or an empty list if the user cancelled
    async fn show_open_dialog(&self, options: OpenDialogOptions) -> io::Result<Vec<PathBuf>>;

    /// Chosen target, or `None` if the user cancelled
    async fn show_save_dialog(&self, options: SaveDialogOptions) -> io::Result<Option<PathBuf>>;
}

/// Dialog host for processes without a UI. Every dialog reads as cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDialogs;

#[async_trait]
impl DialogHost for HeadlessDialogs {
    async fn show_open_dialog(&self, options: OpenDialogOptions) -> io::Result<Vec<PathBuf>> {
        tracing::debug!(title = ?options.title, "open dialog requested without a UI");
        Ok(Vec::new())
    }

    async fn show_save_dialog(&self, options: SaveDialogOptions) -> io::Result<Option<PathBuf>> {
        tracing::debug!(title = ?options.title, "save dialog requested without a UI");
        Ok(None)
    }
}

// ============================================================================
// Tauri dialogs
// ============================================================================

#[cfg(feature = "tauri")]
pub use tauri_dialogs::TauriDialogs;

#[cfg(feature = "tauri")]
mod tauri_dialogs {
    use super::*;
    use std::path::Path;
    use tauri_plugin_dialog::DialogExt;

    /// Dialogs shown through `tauri-plugin-dialog`
    pub struct TauriDialogs<R: tauri::Runtime> {
        app_handle: tauri::AppHandle<R>,
    }

    impl<R: tauri::Runtime> TauriDialogs<R> {
        pub fn new(app_handle: tauri::AppHandle<R>) -> Self {
            Self { app_handle }
        }
    }

    #[async_trait]
    impl<R: tauri::Runtime> DialogHost for TauriDialogs<R> {
        async fn show_open_dialog(&self, options: OpenDialogOptions) -> io::Result<Vec<PathBuf>> {
            let app_handle = self.app_handle.clone();

            // The blocking pickers must stay off the async runtime's workers
            tokio::task::spawn_blocking(move || {
                let mut dialog = app_handle.dialog().file();

                if let Some(t) = options.title {
                    dialog = dialog.set_title(t);
                }

                if let Some(path) = options.initial_path {
                    dialog = dialog.set_directory(path);
                }

                if !options.file_types.is_empty() {
                    let ext_refs: Vec<&str> = options.file_types.iter().map(|s| s.as_str()).collect();
                    dialog = dialog.add_filter("", &ext_refs);
                }

                let selected = if options.choose_directories {
                    dialog.blocking_pick_folder().map(|p| vec![p])
                } else if options.allow_multiple_selection {
                    dialog.blocking_pick_files()
                } else {
                    dialog.blocking_pick_file().map(|p| vec![p])
                };

                selected
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|p| p.as_path().map(Path::to_path_buf))
                    .collect()
            })
            .await
            .map_err(io::Error::other)
        }

        async fn show_save_dialog(&self, options: SaveDialogOptions) -> io::Result<Option<PathBuf>> {
            let app_handle = self.app_handle.clone();

            tokio::task::spawn_blocking(move || {
                let mut dialog = app_handle.dialog().file();

                if let Some(t) = options.title {
                    dialog = dialog.set_title(t);
                }

                if let Some(path) = options.initial_path {
                    dialog = dialog.set_directory(path);
                }

                if let Some(name) = options.proposed_new_filename {
                    dialog = dialog.set_file_name(name);
                }

                dialog
                    .blocking_save_file()
                    .and_then(|p| p.as_path().map(Path::to_path_buf))
            })
            .await
            .map_err(io::Error::other)
        }
    }
}
