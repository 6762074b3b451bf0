use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{validate_key, KeyValueStore, StoreError};

/// File extension for stored values
const VALUE_EXTENSION: &str = "dat";

/// File-backed settings store: each key is a file in `dir`.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, VALUE_EXTENSION))
    }
}

impl KeyValueStore for SettingsStore {
    fn data(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        let path = self.value_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!(key, bytes = bytes.len(), "Read settings value");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set_data(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        let path = self.value_path(key);
        // Write to a sibling file first so readers never see a torn value
        let tmp = path.with_extension(format!("{}.tmp", VALUE_EXTENSION));
        std::fs::write(&tmp, value).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(key, bytes = value.len(), "Wrote settings value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.data("localData").unwrap(), None);
    }

    #[test]
    fn test_set_then_read() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf()).unwrap();
        store.set_data("localData", b"[1,2,3]").unwrap();
        assert_eq!(store.data("localData").unwrap(), Some(b"[1,2,3]".to_vec()));
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf()).unwrap();
        store.set_data("localData", b"first").unwrap();
        store.set_data("localData", b"second").unwrap();
        assert_eq!(store.data("localData").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = SettingsStore::new(dir.path().to_path_buf()).unwrap();
            store.set_data("localData", b"kept").unwrap();
        }
        let reopened = SettingsStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.data("localData").unwrap(), Some(b"kept".to_vec()));
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = SettingsStore::new(nested.clone()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(
            store.set_data("../x", b"nope"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
