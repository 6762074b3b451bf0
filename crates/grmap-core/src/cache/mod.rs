//! Local caching module for offline station data.
//!
//! `CacheManager` keeps the most recently fetched station list in the
//! settings store under the `localData` key. The cache has no expiry: it is
//! read once at startup and rewritten only after a non-empty fetch.

pub mod manager;

pub use manager::{CacheError, CacheManager, LOCAL_DATA_KEY};
