//! Core library for grmap.
//!
//! Loads nearby battery-swap stations for a map front-end: a cached copy
//! from the settings store when one exists, otherwise a fresh fetch from the
//! station service that is then cached for the next start.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod provider;
pub mod store;

pub use api::{ApiClient, ApiError, StationSource};
pub use cache::CacheManager;
pub use config::Config;
pub use models::{Coordinate, RawStation, StationList, StationRecord};
pub use provider::{StationDataProvider, StationObserver};
pub use store::{KeyValueStore, MemoryStore, SettingsStore, StoreError};
