//! REST API client module for the swap-station service.
//!
//! `ApiClient` fetches the public station list; `StationSource` is the seam
//! the data provider depends on, so tests can substitute their own source.

pub mod client;
pub mod error;

pub use client::{ApiClient, StationSource, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
