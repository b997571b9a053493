//! Key-value backends
//!
//! A backend stores opaque string values under string keys. The schema
//! store keeps its whole collection under a single key.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};

/// Persistent string storage addressed by key
pub trait KeyValueBackend {
    /// Reads the value under `key`; `None` when nothing was ever written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the value under `key`.
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// Checks that a key can double as a file stem.
pub fn check_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Backend that keeps each key in `<dir>/<key>.json`.
///
/// Writes go to a temporary file which is fsynced and then renamed over the
/// target, so a crash never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens the backend rooted at `dir`, creating the directory if missing.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                StoreError::Io(format!(
                    "Failed to create store directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Returns the directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueBackend for FileBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        check_key(key)?;

        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(format!("Failed to read '{}': {}", key, e))),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        check_key(key)?;

        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));

        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(value.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io(format!(
                "Failed to write {}: {}",
                tmp_path.display(),
                e
            )));
        }

        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }
}

/// In-memory backend for tests and ephemeral sessions.
///
/// An optional quota caps the size of any single value, which lets callers
/// exercise write failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects values longer than `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(limit),
        }
    }

    /// Stores a raw value, bypassing the quota.
    pub fn seed(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value under `key`
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        check_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        check_key(key)?;

        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }

        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
