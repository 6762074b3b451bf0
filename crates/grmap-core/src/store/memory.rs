use std::collections::HashMap;
use std::sync::Mutex;

use super::{validate_key, KeyValueStore, StoreError};

/// In-process settings store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn data(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set_data(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(!store.contains("localData"));
        assert_eq!(store.data("localData").unwrap(), None);

        store.set_data("localData", b"abc").unwrap();
        assert!(store.contains("localData"));
        assert_eq!(store.data("localData").unwrap(), Some(b"abc".to_vec()));
    }
}
