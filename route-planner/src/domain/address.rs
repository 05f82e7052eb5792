//! Geocoded address records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Coordinates;

/// A geocoded street address.
///
/// Records are keyed in the [`AddressStore`](crate::store::AddressStore)
/// by the free-text query that produced them; the record itself carries
/// the resolved data. A record is immutable once stored and is only ever
/// replaced wholesale by a fresh lookup or a file reload.
///
/// The serialized field names (`direccion`, `coordenadas`, …) are the wire
/// contract of the persisted address file and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Canonical display name returned by the geocoder.
    #[serde(rename = "direccion")]
    pub display_name: String,

    /// Resolved position in degrees. Always finite for records produced
    /// by a lookup; files are loaded as-is.
    #[serde(rename = "coordenadas")]
    pub coords: Coordinates,

    /// Free-form address components (road, city, postcode, …) exactly as
    /// the geocoder returned them.
    #[serde(rename = "componentes", default)]
    pub components: Map<String, Value>,

    /// Identifier of the matched feature in the upstream dataset.
    pub osm_id: i64,

    /// Feature type tag (e.g. "residential", "house").
    #[serde(rename = "tipo")]
    pub kind: String,

    /// Feature category tag (e.g. "highway", "building"), when provided.
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
}

impl AddressRecord {
    /// Creates a record with empty components and tags. Mostly useful in
    /// tests; real records come from the geocoder.
    pub fn bare(display_name: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            display_name: display_name.into(),
            coords,
            components: Map::new(),
            osm_id: 0,
            kind: String::new(),
            category: None,
        }
    }
}
