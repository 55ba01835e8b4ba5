// src/filesystem/path.rs
//!
//! PathString helpers
//!
//! Paths handed to callers are always forward-slash separated, whatever the
//! host uses natively. Conversion happens here and nowhere else.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Names that are not commonly useful to display in a project tree
    pub static ref DEFAULT_EXCLUSIONS: Regex = Regex::new(
        r"\.pyc$|^\.git$|^\.gitignore$|^\.gitmodules$|^\.svn$|^\.DS_Store$|^Thumbs\.db$|^\.hg$|^CVS$|^\.cvsignore$|^\.gitattributes$|^\.hgtags$|^\.hgignore$"
    )
    .expect("default exclusion pattern is valid");
}

/// Replace `native_sep` with `/`
pub fn convert_separators(path: &str, native_sep: char) -> String {
    if native_sep == '/' {
        path.to_string()
    } else {
        path.replace(native_sep, "/")
    }
}

/// Convert a host path into a PathString
pub fn to_portable(path: &Path) -> String {
    convert_separators(&path.to_string_lossy(), MAIN_SEPARATOR)
}

/// Convert a PathString into a host path
pub fn to_native(path: &str) -> PathBuf {
    if MAIN_SEPARATOR == '/' {
        PathBuf::from(path)
    } else {
        PathBuf::from(path.replace('/', &MAIN_SEPARATOR.to_string()))
    }
}

/// Strip a trailing `/`, except for the root itself
pub fn canonical_path(path: &str) -> String {
    if path.len() > 1 && path.ends_with('/') {
        path[..path.len() - 1].to_string()
    } else {
        path.to_string()
    }
}

/// Containing directory of a file or directory path, with a trailing `/`.
///
/// `/a/b/c.txt` and `/a/b/c/` both yield `/a/b/`.
pub fn parent_path(path: &str) -> String {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => String::new(),
    }
}

/// Final segment of a path, ignoring a trailing `/`
pub fn file_name(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Join a directory PathString and an entry name
pub fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// False for entries matched by `exclusions` (tested against the final segment only)
pub fn should_show(path: &str, exclusions: &Regex) -> bool {
    !exclusions.is_match(file_name(path))
}

/// UNC shares (`//host/share`) and any configured mount prefixes count as network drives
pub fn is_network_path(path: &str, extra_prefixes: &[String]) -> bool {
    let is_unc = path.starts_with("//") && path.len() > 2 && !path[2..].starts_with('/');
    is_unc
        || extra_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && path.starts_with(prefix.as_str()))
}
