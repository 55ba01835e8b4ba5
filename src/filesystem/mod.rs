// src/filesystem/mod.rs
//!
//! Filesystem Module
//!
//! Portable filesystem facade: host error translation, watcher change batching,
//! and uniform async file/directory/dialog operations over the host's native APIs.

pub mod batcher;
#[cfg(feature = "tauri")]
pub mod commands;
pub mod config;
pub mod dialog;
pub mod encoding;
pub mod error;
pub mod error_map;
pub mod facade;
pub mod host;
pub mod path;
pub mod types;
pub mod watcher;

pub use config::FsConfig;
pub use error::{ErrorKind, FsError, FsResult};
pub use facade::FileSystem;
pub use types::*;
