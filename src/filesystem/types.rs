// src/filesystem/types.rs

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ts_rs::TS;

use crate::filesystem::error::ErrorKind;

// ============================================================================
// Stats
// ============================================================================

/// Optimistic-concurrency token derived from a file's modification time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileHash(pub String);

impl FileHash {
    pub fn from_mtime(mtime: SystemTime) -> Self {
        let nanos = mtime
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut hasher = Sha256::new();
        hasher.update(nanos.to_be_bytes());
        let digest = hasher.finalize();
        FileHash(hex::encode(&digest[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snapshot of an entry's metadata. Never mutated; a later stat supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatRecord {
    pub is_file: bool,
    /// Last modified time (Unix timestamp in milliseconds)
    pub mtime: u64,
    /// Size in bytes
    pub size: u64,
    /// Resolved target when the path is a symbolic link
    pub real_path: Option<String>,
    pub hash: FileHash,
}

impl StatRecord {
    pub fn new(is_file: bool, mtime: SystemTime, size: u64, real_path: Option<String>) -> Self {
        let millis = mtime
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            is_file,
            mtime: millis,
            size,
            real_path,
            hash: FileHash::from_mtime(mtime),
        }
    }

    pub fn is_directory(&self) -> bool {
        !self.is_file
    }
}

/// Result of [`crate::filesystem::FileSystem::resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", tag = "type")]
#[ts(export)]
pub enum Entry {
    File { path: String, stat: StatRecord },
    Directory { path: String, stat: StatRecord },
}

/// Positionally aligned directory listing: `stats[i]` belongs to `entries[i]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirListing {
    pub entries: Vec<String>,
    pub stats: Vec<Result<StatRecord, ErrorKind>>,
}

// ============================================================================
// Operation options
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReadOptions {
    pub encoding: Option<String>,
    /// A stat the caller already holds; skips the concurrent stat
    pub stat: Option<StatRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WriteOptions {
    pub encoding: Option<String>,
    pub mode: Option<u32>,
    pub expected_hash: Option<FileHash>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReadResult {
    pub data: String,
    pub stat: StatRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WriteResult {
    pub stat: StatRecord,
    /// True when the file did not exist before the write
    pub created: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OpenDialogOptions {
    pub allow_multiple_selection: bool,
    pub choose_directories: bool,
    pub title: Option<String>,
    pub initial_path: Option<String>,
    /// Allowed extensions without the dot. Empty allows anything.
    pub file_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaveDialogOptions {
    pub title: Option<String>,
    pub initial_path: Option<String>,
    pub proposed_new_filename: Option<String>,
}

// ============================================================================
// Watch notifications
// ============================================================================

/// Delivered to the watcher callback registered with `init_watchers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", tag = "type")]
#[ts(export)]
pub enum WatchEvent {
    /// Something changed at `path`. `stat` is present only when a fresh stat
    /// was requested and succeeded; otherwise the caller re-derives state.
    Changed {
        path: String,
        stat: Option<StatRecord>,
    },
    /// The watcher backend dropped. All watched paths have unknown state
    /// until re-stat; nothing is re-subscribed automatically.
    Offline,
}

/// Event name used when forwarding [`WatchEvent`]s to a webview
pub const WATCH_EVENT: &str = "hostfs:change";
