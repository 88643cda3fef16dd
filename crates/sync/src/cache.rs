//! Local key-value cache.
//!
//! Holds the last-known-good catalog and the admin's settings override.
//! Values are JSON strings under three keys:
//!
//! - [`PRODUCTS_KEY`] - array of products
//! - [`CASES_KEY`] - array of case studies
//! - [`CLOUD_SETTINGS_KEY`] - the admin's `CloudSettings` (admin machines only)
//!
//! [`FileStore`] keeps one `<key>.json` file per key and replaces files
//! atomically. [`MemoryStore`] is for tests and ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub const PRODUCTS_KEY: &str = "products";
pub const CASES_KEY: &str = "cases";
pub const CLOUD_SETTINGS_KEY: &str = "cloudSettings";

/// Errors that can occur when reading or writing the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error for `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("cache entry `{key}` is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid cache key `{0}`")]
    InvalidKey(String),
}

/// Durable string storage keyed by name.
pub trait LocalStore {
    /// Read a raw value.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a raw value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the backing storage cannot be modified.
    fn remove(&mut self, key: &str) -> Result<(), CacheError>;

    /// Read and deserialize a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Json` if the stored value does not parse as `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        Self: Sized,
    {
        self.get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| CacheError::Json {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Serialize and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if serialization or the write fails.
    fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), CacheError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| CacheError::Json {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed store: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` for storage. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str, source: io::Error) -> CacheError {
    CacheError::Io {
        key: key.to_string(),
        source,
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

        // Readers only ever see the old or the new file, never a torn one.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))?;

        debug!(key, bytes = value.len(), "Wrote cache entry");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style raw insert, for seeding fixtures.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use showcase_core::defaults::default_products;
    use showcase_core::Product;

    use super::*;

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cache"));
        assert!(store.get(PRODUCTS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("cache"));

        store.set_json(PRODUCTS_KEY, &default_products()).unwrap();
        let loaded: Vec<Product> = store.get_json(PRODUCTS_KEY).unwrap().unwrap();
        assert_eq!(loaded, default_products());
        assert!(dir.path().join("cache/products.json").exists());
        assert!(!dir.path().join("cache/products.json.tmp").exists());
    }

    #[test]
    fn test_file_store_overwrite_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        store.set(CASES_KEY, "[1]").unwrap();
        store.set(CASES_KEY, "[2]").unwrap();
        assert_eq!(store.get(CASES_KEY).unwrap().as_deref(), Some("[2]"));

        store.remove(CASES_KEY).unwrap();
        store.remove(CASES_KEY).unwrap();
        assert!(store.get(CASES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let err = store.set("../escape", "x").unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_settings_key_is_a_valid_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set(CLOUD_SETTINGS_KEY, "{}").unwrap();
        assert!(dir.path().join("cloudSettings.json").exists());
    }

    #[test]
    fn test_get_json_reports_bad_entry() {
        let store = MemoryStore::new().with_entry(CASES_KEY, "{not json");
        let err = store.get_json::<Vec<Product>>(CASES_KEY).unwrap_err();
        assert!(matches!(err, CacheError::Json { ref key, .. } if key == CASES_KEY));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
    }
}
