// src/filesystem/facade.rs
//!
//! IO Facade
//!
//! Uniform async operations over the host's file primitives. Paths in and out are
//! PathStrings; every host failure leaves here as an [`FsError`].
//!

use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::join_all;
use regex::Regex;

use crate::filesystem::batcher::{ChangeBatcher, ChangeCallback, ChangeQueue};
use crate::filesystem::config::FsConfig;
use crate::filesystem::dialog::{DialogHost, HeadlessDialogs};
use crate::filesystem::encoding::{looks_binary, Encoding};
use crate::filesystem::error::{ErrorKind, FsError, FsResult};
use crate::filesystem::error_map::{map_io_error, Access};
use crate::filesystem::host::{HostFs, HostStat, NativeHost};
use crate::filesystem::path::{
    canonical_path, is_network_path, join, parent_path, should_show, to_native, to_portable,
};
use crate::filesystem::types::{
    DirListing, Entry, OpenDialogOptions, ReadOptions, ReadResult, SaveDialogOptions, StatRecord,
    WatchEvent, WriteOptions, WriteResult,
};
use crate::filesystem::watcher::WatcherManager;

struct ChangeSink {
    batcher: ChangeBatcher,
    callback: ChangeCallback,
}

/// The filesystem facade. One long-lived instance per process, shared by reference.
pub struct FileSystem {
    host: Arc<dyn HostFs>,
    dialogs: Arc<dyn DialogHost>,
    config: FsConfig,
    exclusions: Regex,
    watchers: WatcherManager,
    sink: Mutex<Option<ChangeSink>>,
}

impl FileSystem {
    pub fn new(host: Arc<dyn HostFs>, dialogs: Arc<dyn DialogHost>, config: FsConfig) -> Self {
        let exclusions = config.exclusion_regex();

        Self {
            host,
            dialogs,
            config,
            exclusions,
            watchers: WatcherManager::new(),
            sink: Mutex::new(None),
        }
    }

    /// Facade over the local disk with no dialog UI attached
    pub fn native(config: FsConfig) -> Self {
        Self::new(Arc::new(NativeHost::new()), Arc::new(HeadlessDialogs), config)
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    // ========================================================================
    // Stats
    // ========================================================================

    async fn host_stat(&self, path: &str) -> FsResult<StatRecord> {
        self.host
            .stat(&to_native(path))
            .await
            .map(HostStat::into_record)
            .map_err(|e| map_io_error(&e, Access::Read, path))
    }

    pub async fn stat(&self, path: &str) -> FsResult<StatRecord> {
        self.host_stat(path).await
    }

    /// `NotFound` becomes `Ok(false)`; every other stat failure still propagates
    pub async fn exists(&self, path: &str) -> FsResult<bool> {
        match self.host_stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn resolve(&self, path: &str) -> FsResult<Entry> {
        let stat = self.host_stat(path).await?;
        let path = path.to_string();

        if stat.is_directory() {
            Ok(Entry::Directory { path, stat })
        } else {
            Ok(Entry::File { path, stat })
        }
    }

    /// A failed stat of one entry is reported in its slot, not for the whole listing
    pub async fn readdir(&self, path: &str) -> FsResult<DirListing> {
        let entries = self
            .host
            .read_dir(&to_native(path))
            .await
            .map_err(|e| map_io_error(&e, Access::Read, path))?;

        let stats = join_all(entries.iter().map(|name| {
            let entry_path = join(path, name);
            async move {
                self.host_stat(&entry_path)
                    .await
                    .map_err(|e| e.kind)
            }
        }))
        .await;

        Ok(DirListing { entries, stats })
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn mkdir(&self, path: &str, mode: Option<u32>) -> FsResult<StatRecord> {
        let mode = mode.unwrap_or(self.config.default_dir_mode);

        self.host
            .mkdir(&to_native(path), mode)
            .await
            .map_err(|e| map_io_error(&e, Access::Write, path))?;

        let stat = self.host_stat(path).await?;
        self.notify_change(parent_path(path), false);
        Ok(stat)
    }

    /// Never overwrites: an existing `new_path` fails with `AlreadyExists`
    pub async fn rename(&self, old_path: &str, new_path: &str) -> FsResult<()> {
        match self.host_stat(new_path).await {
            Ok(_) => return Err(FsError::new(ErrorKind::AlreadyExists, new_path)),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        self.host
            .rename(&to_native(old_path), &to_native(new_path))
            .await
            .map_err(|e| map_io_error(&e, Access::Write, old_path))
    }

    /// Content read and stat run concurrently unless the caller supplies a stat.
    /// A read failure wins over a stat failure and comes back without data or stat.
    pub async fn read_file(&self, path: &str, options: ReadOptions) -> FsResult<ReadResult> {
        let encoding = self.encoding(options.encoding.as_deref(), path)?;
        let native = to_native(path);

        let (read, stat) = match options.stat {
            Some(stat) => (self.host.read(&native).await, Ok(stat)),
            None => {
                let (read, stat) = tokio::join!(self.host.read(&native), self.host.stat(&native));
                (read, stat.map(HostStat::into_record))
            }
        };

        let bytes = read.map_err(|e| map_io_error(&e, Access::Read, path))?;
        let stat = stat.map_err(|e| map_io_error(&e, Access::Read, path))?;

        if looks_binary(&bytes) {
            return Err(FsError::new(ErrorKind::UnsupportedEncoding, path));
        }

        let data = encoding
            .decode(&bytes)
            .map_err(|kind| FsError::new(kind, path))?;

        Ok(ReadResult { data, stat })
    }

    /// Refuses with `ContentsModified` when `expected_hash` no longer matches the disk
    pub async fn write_file(&self, path: &str, data: &str, options: WriteOptions) -> FsResult<WriteResult> {
        let encoding = self.encoding(options.encoding.as_deref(), path)?;

        let created = match self.host_stat(path).await {
            Ok(current) => {
                if let Some(expected) = &options.expected_hash {
                    if *expected != current.hash {
                        tracing::warn!(
                            %path,
                            expected = expected.as_str(),
                            actual = current.hash.as_str(),
                            "blind write attempted"
                        );
                        return Err(FsError::new(ErrorKind::ContentsModified, path));
                    }
                }
                false
            }
            Err(e) if e.is_not_found() => true,
            Err(e) => return Err(e),
        };

        let bytes = encoding
            .encode(data)
            .map_err(|kind| FsError::new(kind, path))?;

        self.host
            .write(&to_native(path), &bytes, options.mode)
            .await
            .map_err(|e| map_io_error(&e, Access::Write, path))?;

        let stat = self.host_stat(path).await?;

        if created {
            self.notify_change(parent_path(path), false);
        } else {
            self.notify_change(path, true);
        }

        Ok(WriteResult { stat, created })
    }

    pub async fn chmod(&self, path: &str, mode: u32) -> FsResult<()> {
        self.host
            .chmod(&to_native(path), mode)
            .await
            .map_err(|e| map_io_error(&e, Access::Write, path))
    }

    /// Directories are removed with everything below them
    pub async fn unlink(&self, path: &str) -> FsResult<()> {
        self.host
            .remove(&to_native(path))
            .await
            .map_err(|e| map_io_error(&e, Access::Write, path))?;

        self.notify_change(parent_path(path), false);
        Ok(())
    }

    /// Recoverability is whatever the host's trash offers
    pub async fn move_to_trash(&self, path: &str) -> FsResult<()> {
        self.host
            .move_to_trash(&to_native(path))
            .await
            .map_err(|e| map_io_error(&e, Access::Write, path))?;

        self.notify_change(parent_path(path), false);
        Ok(())
    }

    fn encoding(&self, requested: Option<&str>, path: &str) -> FsResult<Encoding> {
        requested
            .unwrap_or(&self.config.default_encoding)
            .parse()
            .map_err(|kind| FsError::new(kind, path))
    }

    // ========================================================================
    // Watchers
    // ========================================================================

    /// Register the change callback and start batching. Any previous
    /// registration and its watched paths are dropped.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime; the batcher task is spawned on it.
    pub fn init_watchers<F>(&self, callback: F)
    where
        F: Fn(WatchEvent) + Send + Sync + 'static,
    {
        self.watchers.unwatch_all();

        let callback: ChangeCallback = Arc::new(callback);
        let batcher = ChangeBatcher::spawn(
            self.config.batch_window(),
            Arc::clone(&self.host),
            Arc::clone(&callback),
        );

        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(ChangeSink { batcher, callback });
    }

    fn sink_handles(&self) -> Option<(ChangeQueue, ChangeCallback)> {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|sink| (sink.batcher.queue(), Arc::clone(&sink.callback)))
    }

    fn notify_change(&self, path: impl Into<String>, needs_stats: bool) {
        if let Some(sink) = self.sink.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            sink.batcher.enqueue(path, needs_stats);
        }
    }

    /// Network drives are refused; host watchers are unreliable there.
    /// `/d/` and `/d` name the same registration.
    pub async fn watch_path(&self, path: &str) -> FsResult<()> {
        let path = canonical_path(path);
        let path = path.as_str();

        if is_network_path(path, &self.config.network_path_prefixes) {
            tracing::warn!(%path, "refusing to watch network drive");
            return Err(FsError::new(ErrorKind::InvalidParams, path));
        }

        self.host_stat(path).await?;

        let Some((queue, callback)) = self.sink_handles() else {
            tracing::warn!(%path, "watch requested before init_watchers");
            return Err(FsError::new(ErrorKind::InvalidParams, path));
        };

        self.watchers
            .watch(path, queue, callback)
            .map_err(|e| map_io_error(&e, Access::Read, path))
    }

    pub fn unwatch_path(&self, path: &str) -> FsResult<()> {
        self.watchers.unwatch(&canonical_path(path));
        Ok(())
    }

    pub fn unwatch_all(&self) -> FsResult<()> {
        self.watchers.unwatch_all();
        Ok(())
    }

    pub fn is_watching(&self, path: &str) -> bool {
        self.watchers.is_watching(&canonical_path(path))
    }

    pub fn is_watcher_online(&self) -> bool {
        self.watchers.is_online()
    }

    /// Flip to offline after a host watcher connection loss. Fires `Offline` once.
    pub fn report_watcher_failure(&self) {
        if let Some((_, callback)) = self.sink_handles() {
            self.watchers.report_backend_error(&callback);
        }
    }

    // ========================================================================
    // Dialogs
    // ========================================================================

    /// Empty selection on cancel
    pub async fn show_open_dialog(&self, options: OpenDialogOptions) -> FsResult<Vec<String>> {
        let path = options.initial_path.clone().unwrap_or_default();

        let selected = self
            .dialogs
            .show_open_dialog(options)
            .await
            .map_err(|e| map_io_error(&e, Access::Read, &path))?;

        Ok(selected.iter().map(|p| to_portable(p)).collect())
    }

    /// `None` on cancel
    pub async fn show_save_dialog(&self, options: SaveDialogOptions) -> FsResult<Option<String>> {
        let path = options.initial_path.clone().unwrap_or_default();

        let selected = self
            .dialogs
            .show_save_dialog(options)
            .await
            .map_err(|e| map_io_error(&e, Access::Read, &path))?;

        Ok(selected.as_deref().map(to_portable))
    }

    // ========================================================================
    // Misc
    // ========================================================================

    pub fn should_show(&self, path: &str) -> bool {
        should_show(path, &self.exclusions)
    }

    /// Drop all watchers and flush pending change notifications
    pub async fn close(&self) {
        self.watchers.unwatch_all();

        let sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(sink) = sink {
            sink.batcher.shutdown().await;
        }
    }
}
