use serde::{Deserialize, Serialize};

/// A station as returned by the swap-station list endpoint.
///
/// This is also the shape persisted in the settings store, so field names
/// must stay byte-compatible with the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStation {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl RawStation {
    /// Direct field copy into the display shape. No validation is applied.
    pub fn to_record(&self) -> StationRecord {
        StationRecord {
            id: self.id.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Geographic coordinate used by the map layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A battery-swap station in display form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct StationRecord {
    id: String,
    latitude: f64,
    longitude: f64,
}

impl StationRecord {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl From<&RawStation> for StationRecord {
    fn from(raw: &RawStation) -> Self {
        raw.to_record()
    }
}

/// Stations in the order they were received from the cache or the API.
pub type StationList = Vec<StationRecord>;

/// Transform a raw response into the display list, preserving order.
pub fn to_station_list(raw: &[RawStation]) -> StationList {
    raw.iter().map(RawStation::to_record).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_station_parses_api_field_names() {
        let json = r#"[{"Id":"A1","Latitude":25.03,"Longitude":121.56}]"#;
        let parsed: Vec<RawStation> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "A1");
        assert_eq!(parsed[0].latitude, 25.03);
        assert_eq!(parsed[0].longitude, 121.56);
    }

    #[test]
    fn test_raw_station_serializes_api_field_names() {
        let raw = RawStation {
            id: "B2".to_string(),
            latitude: 24.0,
            longitude: 120.5,
        };
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["Id"], "B2");
        assert_eq!(json["Latitude"], 24.0);
        assert_eq!(json["Longitude"], 120.5);
    }

    #[test]
    fn test_raw_station_missing_field_fails() {
        let json = r#"[{"Id":"A1","Latitude":25.03}]"#;
        assert!(serde_json::from_str::<Vec<RawStation>>(json).is_err());
    }

    #[test]
    fn test_to_station_list_preserves_order_and_duplicates() {
        let raw = vec![
            RawStation { id: "Z".to_string(), latitude: 1.0, longitude: 2.0 },
            RawStation { id: "A".to_string(), latitude: 3.0, longitude: 4.0 },
            RawStation { id: "Z".to_string(), latitude: 1.0, longitude: 2.0 },
        ];
        let list = to_station_list(&raw);
        let ids: Vec<&str> = list.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["Z", "A", "Z"]);
    }

    #[test]
    fn test_out_of_range_coordinates_pass_through() {
        let raw = RawStation {
            id: "X".to_string(),
            latitude: 123.0,
            longitude: -500.0,
        };
        let record = raw.to_record();
        assert_eq!(record.latitude(), 123.0);
        assert_eq!(record.longitude(), -500.0);
    }

    #[test]
    fn test_coordinate() {
        let record = StationRecord::new("A1", 25.03, 121.56);
        assert_eq!(
            record.coordinate(),
            Coordinate { latitude: 25.03, longitude: 121.56 }
        );
    }
}
