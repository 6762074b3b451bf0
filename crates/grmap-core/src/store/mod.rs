//! Process-wide key-value settings storage.
//!
//! Values are opaque byte blobs addressed by a short string key. Two
//! implementations are provided:
//! - `SettingsStore`: one file per key under the application config directory
//! - `MemoryStore`: in-process map, used for tests and ephemeral sessions

pub mod memory;
pub mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use memory::MemoryStore;
pub use settings::SettingsStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid settings key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Byte-blob storage keyed by name.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was written.
    fn data(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_data(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// Keys become file names, so only a conservative character set is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
