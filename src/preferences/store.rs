// src/preferences/store.rs

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Failed to read preferences '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write preferences '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed preferences '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Preference '{key}' has an unexpected shape: {source}")]
    Shape {
        key: String,
        source: serde_json::Error,
    },

    #[error("Preferences root in '{path}' is not a JSON object")]
    NotAnObject { path: String },
}

/// JSON preferences document bound to a file
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl PreferencesStore {
    /// An empty document that will be saved to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: Map::new(),
        }
    }

    /// Load `path`. A missing file yields an empty document.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let path_str = path.to_string_lossy().to_string();

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path_str, "no preferences file yet");
                return Ok(Self::empty(path));
            }
            Err(source) => return Err(PreferencesError::Read { path: path_str, source }),
        };

        if raw.trim().is_empty() {
            return Ok(Self::empty(path));
        }

        let value: Value = serde_json::from_str(&raw).map_err(|source| PreferencesError::Parse {
            path: path_str.clone(),
            source,
        })?;

        match value {
            Value::Object(values) => Ok(Self { path, values }),
            _ => Err(PreferencesError::NotAnObject { path: path_str }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Deserialize the value under `key`. Missing keys yield `Ok(None)`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PreferencesError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| PreferencesError::Shape {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), PreferencesError> {
        let value = serde_json::to_value(value).map_err(|source| PreferencesError::Shape {
            key: key.to_string(),
            source,
        })?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Write the document as pretty JSON, replacing the file atomically
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path_str = self.path.to_string_lossy().to_string();
        let write_err = |source| PreferencesError::Write {
            path: path_str.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let json = serde_json::to_vec_pretty(&self.values).map_err(|source| PreferencesError::Parse {
            path: path_str.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(&json).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %path_str, keys = self.values.len(), "preferences saved");
        Ok(())
    }
}
