//! Key-value persistence backends.
//!
//! The book store writes a single serialized value under a fixed key.
//! [`FileStorage`] keeps one `<key>.json` file per key inside a data
//! directory; [`MemoryStorage`] is the in-process equivalent.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::CoreError;

/// Minimal string key-value contract.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing was written.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
}

// ── In-memory ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, as if a previous session had written it.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// ── File-backed ─────────────────────────────────────────────────────

/// One JSON file per key under `dir`. Writes land in a sibling temp
/// file and are renamed into place, so readers never see a torn value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                trace!(path = %path.display(), bytes = contents.len(), "read key");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::storage(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| CoreError::storage(key, e))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|e| CoreError::storage(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| CoreError::storage(key, e))?;

        trace!(path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }
}
