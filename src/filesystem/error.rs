// src/filesystem/error.rs
//!
//! Portable error taxonomy
//!
//! Every failure that crosses the facade boundary is one of the [`ErrorKind`]s below.
//! Raw host errors are translated by [`crate::filesystem::error_map`] first.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Closed set of portable filesystem error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorKind {
    #[error("invalid parameters")]
    InvalidParams,

    #[error("not found")]
    NotFound,

    #[error("not readable")]
    NotReadable,

    #[error("not writable")]
    NotWritable,

    #[error("out of space")]
    OutOfSpace,

    #[error("already exists")]
    AlreadyExists,

    #[error("unsupported encoding")]
    UnsupportedEncoding,

    #[error("contents modified")]
    ContentsModified,

    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Stable wire name, e.g. `NOT_FOUND`
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidParams => "INVALID_PARAMS",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::NotReadable => "NOT_READABLE",
            ErrorKind::NotWritable => "NOT_WRITABLE",
            ErrorKind::OutOfSpace => "OUT_OF_SPACE",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::UnsupportedEncoding => "UNSUPPORTED_ENCODING",
            ErrorKind::ContentsModified => "CONTENTS_MODIFIED",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

/// A failed facade operation: the portable kind plus the path it concerned.
///
/// The facade never produces user-facing text. The UI layer localizes from `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
#[error("{kind} ({path})")]
pub struct FsError {
    pub kind: ErrorKind,
    pub path: String,
}

impl FsError {
    pub fn new(kind: ErrorKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

pub type FsResult<T> = Result<T, FsError>;
