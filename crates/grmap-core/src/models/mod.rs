//! Data models for swap-station entities.
//!
//! - `RawStation`: the API response shape, also the persisted cache shape
//! - `StationRecord`: the display shape published to the UI layer

pub mod station;

pub use station::{to_station_list, Coordinate, RawStation, StationList, StationRecord};
