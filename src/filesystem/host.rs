// src/filesystem/host.rs
//!
//! Downstream host seam
//!
//! [`HostFs`] is the facade's only outbound interface for file operations. Calls take
//! host-native paths and fail with host-native error codes (`std::io::Error`);
//! normalisation happens in the facade, never here.
//!

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::filesystem::path::to_portable;
use crate::filesystem::types::StatRecord;

/// Raw metadata as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStat {
    pub is_file: bool,
    pub mtime: SystemTime,
    pub size: u64,
    pub real_path: Option<PathBuf>,
}

#[async_trait]
pub trait HostFs: Send + Sync {
    async fn stat(&self, path: &Path) -> io::Result<HostStat>;

    /// Entry names (not full paths) of a directory
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate `path`. `mode` only applies when the file is created.
    async fn write(&self, path: &Path, data: &[u8], mode: Option<u32>) -> io::Result<()>;

    async fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()>;

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    async fn chmod(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Remove a file, or a directory with everything below it
    async fn remove(&self, path: &Path) -> io::Result<()>;

    async fn move_to_trash(&self, path: &Path) -> io::Result<()>;
}

// ============================================================================
// Native host (tokio::fs)
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeHost;

impl NativeHost {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostFs for NativeHost {
    async fn stat(&self, path: &Path) -> io::Result<HostStat> {
        let link_meta = tokio::fs::symlink_metadata(path).await?;

        let (meta, real_path) = if link_meta.file_type().is_symlink() {
            let real_path = tokio::fs::canonicalize(path).await?;
            (tokio::fs::metadata(path).await?, Some(real_path))
        } else {
            (link_meta, None)
        };

        Ok(HostStat {
            is_file: !meta.is_dir(),
            mtime: meta.modified()?,
            size: meta.len(),
            real_path,
        })
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();

        while let Some(entry) = reader.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().to_string());
        }

        names.sort();
        Ok(names)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write(&self, path: &Path, data: &[u8], mode: Option<u32>) -> io::Result<()> {
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        if let Some(mode) = mode {
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options.open(path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut builder = tokio::fs::DirBuilder::new();

        #[cfg(unix)]
        builder.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;

        builder.create(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        tokio::fs::rename(from, to).await
    }

    async fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
        }

        #[cfg(not(unix))]
        {
            let _ = mode;
            tokio::fs::metadata(path).await.map(|_| ())
        }
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = tokio::fs::symlink_metadata(path).await?;

        if meta.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        }
    }

    async fn move_to_trash(&self, path: &Path) -> io::Result<()> {
        // Surface NotFound from the host rather than from the trash backend
        tokio::fs::symlink_metadata(path).await?;

        #[cfg(not(target_os = "android"))]
        {
            let path = path.to_path_buf();
            tokio::task::spawn_blocking(move || trash::delete(&path))
                .await
                .map_err(io::Error::other)?
                .map_err(|e| io::Error::other(e.to_string()))
        }

        // On Android, trash is not available
        #[cfg(target_os = "android")]
        {
            Err(io::Error::from(io::ErrorKind::Unsupported))
        }
    }
}

impl HostStat {
    /// Portable form handed to callers
    pub fn into_record(self) -> StatRecord {
        let real_path = self.real_path.as_deref().map(to_portable);
        StatRecord::new(self.is_file, self.mtime, self.size, real_path)
    }
}
