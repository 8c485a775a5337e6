//! File-backed key-value store
//!
//! Layout: `{dir}/{key}.json`, one file per key. Writes go to a temporary
//! sibling first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::storage::KeyValueStore;

// == File Store ==
/// Directory-based store for the binary's durable cache.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                CacheError::Storage(format!("Failed to create cache directory {:?}: {}", dir, e))
            })?;
            info!("Created cache directory: {:?}", dir);
        }

        Ok(Self { dir })
    }

    /// Returns the root directory of this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CacheError::InvalidRequest(format!(
                "Storage key '{}' must be non-empty ASCII alphanumerics, '_' or '-'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Storage(format!(
                "Failed to read {:?}: {}",
                path, e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("tmp");

        fs::write(&tmp_path, value)
            .map_err(|e| CacheError::Storage(format!("Failed to write {:?}: {}", tmp_path, e)))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| CacheError::Storage(format!("Failed to replace {:?}: {}", path, e)))?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Storage(format!(
                "Failed to remove {:?}: {}",
                path, e
            ))),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("cache");

        let store = FileStore::new(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn test_set_get_remove_cycle() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path()).unwrap();

        assert_eq!(store.get("exercise_cache").unwrap(), None);

        store.set("exercise_cache", "{\"version\":1}").unwrap();
        assert_eq!(
            store.get("exercise_cache").unwrap().as_deref(),
            Some("{\"version\":1}")
        );
        assert!(tmp.path().join("exercise_cache.json").is_file());
        assert!(!tmp.path().join("exercise_cache.tmp").exists());

        store.remove("exercise_cache").unwrap();
        assert_eq!(store.get("exercise_cache").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path()).unwrap();

        assert!(store.remove("never_written").is_ok());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path()).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(CacheError::InvalidRequest(_))
        ));
        assert!(matches!(store.get(""), Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_survives_reopen() {
        let tmp = TempDir::new().unwrap();

        FileStore::new(tmp.path())
            .unwrap()
            .set("feedback_cache", "payload")
            .unwrap();

        let reopened = FileStore::new(tmp.path()).unwrap();
        assert_eq!(
            reopened.get("feedback_cache").unwrap().as_deref(),
            Some("payload")
        );
    }
}
