// src/filesystem/watcher.rs
//!
//! Host file watcher registrations
//!
//! Each watched path gets its own non-recursive `notify` watcher. Raw events are
//! classified and pushed into the change batcher; a backend error flips the manager
//! offline and fires a single [`WatchEvent::Offline`].
//! Only available on desktop platforms (not Android).
//!

use std::io;

#[cfg(not(target_os = "android"))]
use notify::event::ModifyKind;
#[cfg(not(target_os = "android"))]
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
#[cfg(not(target_os = "android"))]
use std::collections::HashMap;
#[cfg(not(target_os = "android"))]
use std::path::Path;
#[cfg(not(target_os = "android"))]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(not(target_os = "android"))]
use std::sync::{Arc, Mutex, PoisonError};

use crate::filesystem::batcher::{ChangeCallback, ChangeQueue};
#[cfg(not(target_os = "android"))]
use crate::filesystem::path::{parent_path, to_native, to_portable};
#[cfg(not(target_os = "android"))]
use crate::filesystem::types::WatchEvent;

/// What a raw watcher event means for the batcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedChange {
    pub path: String,
    pub needs_stats: bool,
}

/// Content changes point at the entry itself and want fresh stats. Structural
/// changes (create, remove, rename) point at the containing directory.
#[cfg(not(target_os = "android"))]
pub fn classify_event(kind: &EventKind, path: &Path) -> Option<ClassifiedChange> {
    let portable = to_portable(path);

    match kind {
        EventKind::Access(_) => None,
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Create(_) | EventKind::Remove(_) => {
            Some(ClassifiedChange {
                path: parent_path(&portable),
                needs_stats: false,
            })
        }
        EventKind::Modify(_) => Some(ClassifiedChange {
            path: portable,
            needs_stats: true,
        }),
        EventKind::Any | EventKind::Other => Some(ClassifiedChange {
            path: parent_path(&portable),
            needs_stats: false,
        }),
    }
}

#[cfg(not(target_os = "android"))]
fn notify_to_io(e: notify::Error) -> io::Error {
    match e.kind {
        notify::ErrorKind::Io(err) => err,
        notify::ErrorKind::PathNotFound => io::Error::from(io::ErrorKind::NotFound),
        other => io::Error::other(format!("{:?}", other)),
    }
}

/// Watcher registrations for desktop platforms
#[cfg(not(target_os = "android"))]
pub struct WatcherManager {
    /// Map of PathString -> watcher handle
    watchers: Mutex<HashMap<String, RecommendedWatcher>>,
    online: Arc<AtomicBool>,
}

#[cfg(not(target_os = "android"))]
impl WatcherManager {
    pub fn new() -> Self {
        Self {
            watchers: Mutex::new(HashMap::new()),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Start watching `path`. Watching an already watched path is a no-op.
    pub fn watch(&self, path: &str, queue: ChangeQueue, callback: ChangeCallback) -> io::Result<()> {
        let mut watchers = self.watchers.lock().unwrap_or_else(PoisonError::into_inner);
        if watchers.contains_key(path) {
            return Ok(());
        }

        let online = Arc::clone(&self.online);
        let watched = path.to_string();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    for changed in &event.paths {
                        if let Some(change) = classify_event(&event.kind, changed) {
                            if !queue.enqueue(change.path, change.needs_stats) {
                                tracing::debug!(path = %watched, "batcher stopped, dropping watcher event");
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(path = %watched, error = %e, "file watcher failed");
                    go_offline(&online, &callback);
                }
            }
        })
        .map_err(notify_to_io)?;

        watcher
            .watch(&to_native(path), RecursiveMode::NonRecursive)
            .map_err(notify_to_io)?;

        watchers.insert(path.to_string(), watcher);
        tracing::info!(%path, "started watching");
        Ok(())
    }

    /// Stop watching `path`. Unknown paths are not an error.
    pub fn unwatch(&self, path: &str) {
        let removed = self
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some();

        if removed {
            tracing::info!(%path, "stopped watching");
        }
    }

    /// Drop every registration and return to the online state
    pub fn unwatch_all(&self) {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.online.store(true, Ordering::SeqCst);
        tracing::info!("stopped all watchers");
    }

    pub fn is_watching(&self, path: &str) -> bool {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Record a backend failure reported outside a watcher callback
    pub fn report_backend_error(&self, callback: &ChangeCallback) {
        go_offline(&self.online, callback);
    }
}

/// Online -> Offline fires the callback; further failures stay silent
#[cfg(not(target_os = "android"))]
fn go_offline(online: &AtomicBool, callback: &ChangeCallback) {
    if online.swap(false, Ordering::SeqCst) {
        tracing::warn!("file watchers offline, watched paths have unknown state");
        callback(WatchEvent::Offline);
    }
}

#[cfg(not(target_os = "android"))]
impl Default for WatcherManager {
    fn default() -> Self {
        Self::new()
    }
}

// Stub implementation for Android
#[cfg(target_os = "android")]
pub struct WatcherManager;

#[cfg(target_os = "android")]
impl WatcherManager {
    pub fn new() -> Self {
        Self
    }

    pub fn watch(&self, _path: &str, _queue: ChangeQueue, _callback: ChangeCallback) -> io::Result<()> {
        // File watching is not supported on Android
        Ok(())
    }

    pub fn unwatch(&self, _path: &str) {}

    pub fn unwatch_all(&self) {}

    pub fn is_watching(&self, _path: &str) -> bool {
        false
    }

    pub fn is_online(&self) -> bool {
        true
    }

    pub fn report_backend_error(&self, _callback: &ChangeCallback) {}
}

#[cfg(target_os = "android")]
impl Default for WatcherManager {
    fn default() -> Self {
        Self::new()
    }
}
