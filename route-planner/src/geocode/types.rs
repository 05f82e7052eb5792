//! Nominatim response types and conversion to domain records.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{AddressRecord, Coordinates};

/// One search result from the Nominatim API.
///
/// Coordinates arrive as strings and are parsed during conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    /// Address components, present when `addressdetails=1` was requested.
    #[serde(default)]
    pub address: Map<String, Value>,
    #[serde(default)]
    pub osm_id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "class", default)]
    pub category: Option<String>,
}

/// Error converting a Nominatim result into an [`AddressRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unusable coordinate {field}={value:?} in geocode result")]
pub struct BadPlaceCoordinate {
    field: &'static str,
    value: String,
}

impl NominatimPlace {
    /// Converts the raw result into a domain record, parsing and
    /// validating the coordinate strings.
    pub fn into_record(self) -> Result<AddressRecord, BadPlaceCoordinate> {
        let lat = parse_coordinate("lat", &self.lat)?;
        let lon = parse_coordinate("lon", &self.lon)?;

        Ok(AddressRecord {
            display_name: self.display_name,
            coords: Coordinates::new(lat, lon),
            components: self.address,
            osm_id: self.osm_id,
            kind: self.kind,
            category: self.category,
        })
    }
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64, BadPlaceCoordinate> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(BadPlaceCoordinate {
            field,
            value: value.to_string(),
        }),
    }
}
