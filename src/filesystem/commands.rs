// src/filesystem/commands.rs
//!
//! Tauri command surface
//!
//! Thin wrappers that expose the facade held in [`AppState`] to the webview.
//! Watch notifications are forwarded as `hostfs:change` events.

use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Emitter, Manager, Runtime, State};

use crate::filesystem::dialog::TauriDialogs;
use crate::filesystem::error::FsError;
use crate::filesystem::types::{
    DirListing, Entry, OpenDialogOptions, ReadOptions, ReadResult, SaveDialogOptions, StatRecord,
    WriteOptions, WriteResult, WATCH_EVENT,
};
use crate::AppState;

/// Preferences file inside the app config directory
const PREFERENCES_FILE: &str = "preferences.json";

// ============================================================================
// Commands
// ============================================================================

#[tauri::command]
pub async fn hostfs_stat(state: State<'_, AppState>, path: String) -> Result<StatRecord, FsError> {
    state.fs.stat(&path).await
}

#[tauri::command]
pub async fn hostfs_exists(state: State<'_, AppState>, path: String) -> Result<bool, FsError> {
    state.fs.exists(&path).await
}

#[tauri::command]
pub async fn hostfs_resolve(state: State<'_, AppState>, path: String) -> Result<Entry, FsError> {
    state.fs.resolve(&path).await
}

#[tauri::command]
pub async fn hostfs_readdir(state: State<'_, AppState>, path: String) -> Result<DirListing, FsError> {
    state.fs.readdir(&path).await
}

#[tauri::command]
pub async fn hostfs_mkdir(
    state: State<'_, AppState>,
    path: String,
    mode: Option<u32>,
) -> Result<StatRecord, FsError> {
    state.fs.mkdir(&path, mode).await
}

#[tauri::command]
pub async fn hostfs_rename(
    state: State<'_, AppState>,
    old_path: String,
    new_path: String,
) -> Result<(), FsError> {
    state.fs.rename(&old_path, &new_path).await
}

#[tauri::command]
pub async fn hostfs_read_file(
    state: State<'_, AppState>,
    path: String,
    options: Option<ReadOptions>,
) -> Result<ReadResult, FsError> {
    state.fs.read_file(&path, options.unwrap_or_default()).await
}

#[tauri::command]
pub async fn hostfs_write_file(
    state: State<'_, AppState>,
    path: String,
    data: String,
    options: Option<WriteOptions>,
) -> Result<WriteResult, FsError> {
    state.fs.write_file(&path, &data, options.unwrap_or_default()).await
}

#[tauri::command]
pub async fn hostfs_chmod(state: State<'_, AppState>, path: String, mode: u32) -> Result<(), FsError> {
    state.fs.chmod(&path, mode).await
}

#[tauri::command]
pub async fn hostfs_unlink(state: State<'_, AppState>, path: String) -> Result<(), FsError> {
    state.fs.unlink(&path).await
}

#[tauri::command]
pub async fn hostfs_move_to_trash(state: State<'_, AppState>, path: String) -> Result<(), FsError> {
    state.fs.move_to_trash(&path).await
}

/// Route watch notifications of the managed facade to every webview
#[tauri::command]
pub async fn hostfs_init_watchers<R: Runtime>(
    app_handle: AppHandle<R>,
    state: State<'_, AppState>,
) -> Result<(), FsError> {
    state.fs.init_watchers(move |event| {
        if let Err(e) = app_handle.emit(WATCH_EVENT, &event) {
            tracing::error!(error = %e, "failed to emit watch event");
        }
    });
    Ok(())
}

#[tauri::command]
pub async fn hostfs_watch_path(state: State<'_, AppState>, path: String) -> Result<(), FsError> {
    state.fs.watch_path(&path).await
}

#[tauri::command]
pub async fn hostfs_unwatch_path(state: State<'_, AppState>, path: String) -> Result<(), FsError> {
    state.fs.unwatch_path(&path)
}

#[tauri::command]
pub async fn hostfs_unwatch_all(state: State<'_, AppState>) -> Result<(), FsError> {
    state.fs.unwatch_all()
}

#[tauri::command]
pub async fn hostfs_show_open_dialog(
    state: State<'_, AppState>,
    options: OpenDialogOptions,
) -> Result<Vec<String>, FsError> {
    state.fs.show_open_dialog(options).await
}

#[tauri::command]
pub async fn hostfs_show_save_dialog(
    state: State<'_, AppState>,
    options: SaveDialogOptions,
) -> Result<Option<String>, FsError> {
    state.fs.show_save_dialog(options).await
}

// ============================================================================
// Plugin
// ============================================================================

/// Registers the commands and manages an [`AppState`] whose dialogs go through
/// `tauri-plugin-dialog` (which the app must also register).
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("hostfs")
        .invoke_handler(tauri::generate_handler![
            hostfs_stat,
            hostfs_exists,
            hostfs_resolve,
            hostfs_readdir,
            hostfs_mkdir,
            hostfs_rename,
            hostfs_read_file,
            hostfs_write_file,
            hostfs_chmod,
            hostfs_unlink,
            hostfs_move_to_trash,
            hostfs_init_watchers,
            hostfs_watch_path,
            hostfs_unwatch_path,
            hostfs_unwatch_all,
            hostfs_show_open_dialog,
            hostfs_show_save_dialog,
        ])
        .setup(|app, _api| {
            let prefs_path = app.path().app_config_dir()?.join(PREFERENCES_FILE);
            let dialogs = std::sync::Arc::new(TauriDialogs::new(app.clone()));
            let state = AppState::initialize(prefs_path, dialogs)?;
            app.manage(state);
            Ok(())
        })
        .build()
}
