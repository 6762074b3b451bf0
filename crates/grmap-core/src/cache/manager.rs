use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::RawStation;
use crate::store::{KeyValueStore, StoreError};

/// Settings key holding the last fetched station list.
pub const LOCAL_DATA_KEY: &str = "localData";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to decode cached {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {key} for caching: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Station cache on top of the settings store.
///
/// Stores the raw API shape as a JSON array with no timestamp or envelope,
/// so the blob can be decoded with the same type as the network body.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn KeyValueStore>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let bytes = match self.store.data(key)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let value = serde_json::from_slice(&bytes).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })?;

        Ok(Some(value))
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(data).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set_data(key, &bytes)?;
        Ok(())
    }

    // ===== Stations =====

    /// Load the cached raw station list.
    ///
    /// `Ok(None)` means nothing was ever cached; a blob that does not decode
    /// is reported as `CacheError::Decode`.
    pub fn load_stations(&self) -> Result<Option<Vec<RawStation>>, CacheError> {
        let loaded: Option<Vec<RawStation>> = self.load(LOCAL_DATA_KEY)?;
        if let Some(ref stations) = loaded {
            debug!(count = stations.len(), "Loaded stations from cache");
        }
        Ok(loaded)
    }

    /// Replace the cached raw station list.
    pub fn save_stations(&self, stations: &[RawStation]) -> Result<(), CacheError> {
        self.save(LOCAL_DATA_KEY, stations)?;
        debug!(count = stations.len(), "Cached stations");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn raw(id: &str, latitude: f64, longitude: f64) -> RawStation {
        RawStation {
            id: id.to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_load_stations_absent() {
        let cache = CacheManager::new(Arc::new(MemoryStore::new()));
        assert!(cache.load_stations().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_stations() {
        let cache = CacheManager::new(Arc::new(MemoryStore::new()));
        let stations = vec![raw("A1", 25.03, 121.56), raw("B2", 24.15, 120.67)];
        cache.save_stations(&stations).unwrap();
        assert_eq!(cache.load_stations().unwrap(), Some(stations));
    }

    #[test]
    fn test_blob_is_raw_api_array() {
        let store = Arc::new(MemoryStore::new());
        let cache = CacheManager::new(store.clone());
        cache.save_stations(&[raw("A1", 25.03, 121.56)]).unwrap();

        let bytes = store.data(LOCAL_DATA_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"Id": "A1", "Latitude": 25.03, "Longitude": 121.56}])
        );
    }

    #[test]
    fn test_malformed_blob_is_decode_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_data(LOCAL_DATA_KEY, b"{not json").unwrap();
        let cache = CacheManager::new(store);
        assert!(matches!(
            cache.load_stations(),
            Err(CacheError::Decode { .. })
        ));
    }
}
