// src/filesystem/error_map.rs
//!
//! Host error code translation
//!
//! Maps the host's native error codes (`std::io::ErrorKind`) onto the portable
//! [`ErrorKind`] taxonomy. The table is the single source of truth; the only
//! conditional rule is the read/write flip for permission failures.

use std::collections::HashMap;
use std::io;

use lazy_static::lazy_static;

use crate::filesystem::error::{ErrorKind, FsError};

/// Direction of the host call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    /// Open-for-write, rename target, delete, mkdir, chmod
    Write,
}

lazy_static! {
    static ref HOST_ERROR_TABLE: HashMap<io::ErrorKind, ErrorKind> = {
        let mut table = HashMap::new();
        table.insert(io::ErrorKind::InvalidInput, ErrorKind::InvalidParams);
        table.insert(io::ErrorKind::NotADirectory, ErrorKind::InvalidParams);
        table.insert(io::ErrorKind::IsADirectory, ErrorKind::InvalidParams);
        table.insert(io::ErrorKind::NotFound, ErrorKind::NotFound);
        table.insert(io::ErrorKind::PermissionDenied, ErrorKind::NotReadable);
        table.insert(io::ErrorKind::UnexpectedEof, ErrorKind::NotReadable);
        table.insert(io::ErrorKind::ReadOnlyFilesystem, ErrorKind::NotWritable);
        table.insert(io::ErrorKind::StorageFull, ErrorKind::OutOfSpace);
        table.insert(io::ErrorKind::FileTooLarge, ErrorKind::OutOfSpace);
        table.insert(io::ErrorKind::AlreadyExists, ErrorKind::AlreadyExists);
        table.insert(io::ErrorKind::DirectoryNotEmpty, ErrorKind::AlreadyExists);
        table.insert(io::ErrorKind::InvalidData, ErrorKind::UnsupportedEncoding);
        table
    };
}

/// Translate a host error code. `None` means the host call succeeded.
///
/// Read-failure kinds become `NotWritable` when the failed call was a write.
/// Codes missing from the table become `Unknown` and are logged on every occurrence.
pub fn map_host_error(code: Option<io::ErrorKind>, access: Access) -> Option<ErrorKind> {
    let code = code?;

    let kind = match HOST_ERROR_TABLE.get(&code) {
        Some(kind) => *kind,
        None => {
            tracing::warn!(host_code = ?code, ?access, "unmapped host error code");
            return Some(ErrorKind::Unknown);
        }
    };

    if kind == ErrorKind::NotReadable && access == Access::Write {
        Some(ErrorKind::NotWritable)
    } else {
        Some(kind)
    }
}

/// Map an `io::Error` from a call on `path` into an [`FsError`]
pub fn map_io_error(err: &io::Error, access: Access, path: &str) -> FsError {
    let kind = map_host_error(Some(err.kind()), access).unwrap_or(ErrorKind::Unknown);
    FsError::new(kind, path)
}
