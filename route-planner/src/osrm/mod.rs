//! Turn-by-turn driving routes from OSRM.
//!
//! Wraps the public OSRM HTTP API for the point-to-point detail view.
//! Every failure — network, status, parse — degrades to a local estimate
//! built from the great-circle distance, so callers always get a usable
//! route and never an availability error.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::distance::haversine_km;
use crate::domain::{Coordinates, Instruction, TransportMode};
use crate::store::{AddressNotFound, AddressStore};

/// Default base URL for the public OSRM instance.
const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

/// Estimated fallback pace, minutes per kilometer.
const FALLBACK_MINS_PER_KM: f64 = 3.0;

/// OSRM encodes geometries with 5 decimal places of precision.
const POLYLINE_PRECISION: u32 = 5;

/// Where a [`DrivingRoute`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrivingRouteSource {
    /// Computed by the routing provider.
    Provider,
    /// Synthesized locally because the provider was unavailable.
    LocalEstimate,
}

/// A point-to-point driving route.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingRoute {
    /// Total travel time in seconds.
    pub total_duration_secs: f64,
    /// Total length in kilometers.
    pub total_distance_km: f64,
    /// Step-by-step instructions.
    pub instructions: Vec<Instruction>,
    /// Decoded path geometry.
    pub geometry: Vec<Coordinates>,
    /// Provider result or local estimate.
    pub source: DrivingRouteSource,
}

/// Errors from the OSRM transport layer. Absorbed inside
/// [`OsrmClient::route`]; public for logging and tests.
#[derive(Debug, thiserror::Error)]
pub enum OsrmError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing API returned status {status}")]
    Api { status: u16 },

    #[error("routing response held no routes")]
    Empty,

    #[error("routing geometry could not be decoded: {0}")]
    Geometry(String),
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    duration: f64,
    /// Meters; converted to kilometers on our side.
    distance: f64,
    geometry: String,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the API (defaults to the public instance).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl OsrmConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Blocking OSRM routing client.
pub struct OsrmClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl OsrmClient {
    /// Creates a client from the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, OsrmError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Driving route between two stored addresses.
    ///
    /// Fails only when a key has no stored record. Provider failures are
    /// logged and answered with the local estimate instead.
    pub fn route(
        &self,
        store: &AddressStore,
        origin: &str,
        destination: &str,
    ) -> Result<DrivingRoute, AddressNotFound> {
        let from = store
            .coords_of(origin)
            .ok_or_else(|| AddressNotFound(origin.to_string()))?;
        let to = store
            .coords_of(destination)
            .ok_or_else(|| AddressNotFound(destination.to_string()))?;

        match self.fetch(&from, &to) {
            Ok(route) => {
                debug!(origin, destination, "routing provider answered");
                Ok(route)
            }
            Err(error) => {
                warn!(origin, destination, %error, "routing provider unavailable, using local estimate");
                Ok(local_estimate(origin, &from, destination, &to))
            }
        }
    }

    fn fetch(&self, from: &Coordinates, to: &Coordinates) -> Result<DrivingRoute, OsrmError> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, from.lon, from.lat, to.lon, to.lat
        );

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "polyline")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OsrmError::Api {
                status: status.as_u16(),
            });
        }

        let body: OsrmResponse = response.json()?;
        let route = body.routes.into_iter().next().ok_or(OsrmError::Empty)?;

        let line: geo_types::LineString<f64> =
            polyline::decode_polyline(&route.geometry, POLYLINE_PRECISION)
                .map_err(|e| OsrmError::Geometry(e.to_string()))?;
        let geometry = line
            .coords()
            .map(|c| Coordinates::new(c.y, c.x))
            .collect();

        let instructions = route
            .legs
            .iter()
            .flat_map(|leg| &leg.steps)
            .map(|step| Instruction {
                text: step.name.clone(),
                distance_km: step.distance / 1000.0,
                duration_secs: step.duration,
                mode: TransportMode::Private,
            })
            .collect();

        Ok(DrivingRoute {
            total_duration_secs: route.duration,
            total_distance_km: route.distance / 1000.0,
            instructions,
            geometry,
            source: DrivingRouteSource::Provider,
        })
    }
}

/// Straight-line substitute used whenever the provider cannot answer.
fn local_estimate(
    origin: &str,
    from: &Coordinates,
    destination: &str,
    to: &Coordinates,
) -> DrivingRoute {
    // Records written by lookups always have finite coordinates, so the
    // distance is computable; an unvalidated file load can still defeat
    // that, in which case the estimate degrades to zero length.
    let distance_km = haversine_km(from, to).unwrap_or(0.0);
    let duration_secs = distance_km * FALLBACK_MINS_PER_KM * 60.0;

    DrivingRoute {
        total_duration_secs: duration_secs,
        total_distance_km: distance_km,
        instructions: vec![Instruction {
            text: format!("Drive from {origin} to {destination}"),
            distance_km,
            duration_secs,
            mode: TransportMode::Private,
        }],
        geometry: vec![*from, *to],
        source: DrivingRouteSource::LocalEstimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AddressRecord;

    fn store() -> AddressStore {
        let mut store = AddressStore::new();
        store.insert_record("a", AddressRecord::bare("A", Coordinates::new(0.0, 0.0)));
        store.insert_record("b", AddressRecord::bare("B", Coordinates::new(0.0, 1.0)));
        store
    }

    #[test]
    fn config_defaults() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn unknown_address_is_an_error() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let err = client.route(&store(), "a", "ghost").unwrap_err();
        assert_eq!(err, AddressNotFound("ghost".into()));
    }

    #[test]
    fn unreachable_provider_falls_back_to_estimate() {
        // Port 9 (discard) refuses connections.
        let config = OsrmConfig::default().with_base_url("http://127.0.0.1:9");
        let client = OsrmClient::new(config).unwrap();

        let route = client.route(&store(), "a", "b").unwrap();

        assert_eq!(route.source, DrivingRouteSource::LocalEstimate);
        assert!((route.total_distance_km - 111.19).abs() < 0.1);
        assert!(
            (route.total_duration_secs - route.total_distance_km * 3.0 * 60.0).abs() < 1e-6
        );
        assert_eq!(route.instructions.len(), 1);
        assert_eq!(route.geometry.len(), 2);
    }

    #[test]
    fn response_parsing_and_unit_conversion() {
        let json = serde_json::json!({
            "code": "Ok",
            "routes": [{
                "duration": 600.0,
                "distance": 5000.0,
                "geometry": "_ibE_seK_seK_seK",
                "legs": [{
                    "steps": [
                        {"name": "Av. Alcalde", "distance": 3000.0, "duration": 350.0},
                        {"name": "Calz. Independencia", "distance": 2000.0, "duration": 250.0}
                    ]
                }]
            }]
        });

        let parsed: OsrmResponse = serde_json::from_value(json).unwrap();
        let route = &parsed.routes[0];
        assert_eq!(route.distance, 5000.0);
        assert_eq!(route.legs[0].steps.len(), 2);

        let line = polyline::decode_polyline(&route.geometry, POLYLINE_PRECISION).unwrap();
        assert_eq!(line.coords().count(), 2);
    }
}
