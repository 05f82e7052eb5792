//! Address store.
//!
//! Single source of truth for geocoded addresses. The store owns the
//! record map and both graphs so that edge insertion can enforce the
//! "endpoints must exist" invariant; graph mutation from outside the
//! store goes through the methods here.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::distance::haversine_km;
use crate::domain::{AddressRecord, Coordinates};
use crate::geocode::Geocoder;
use crate::graph::{ConnectivityGraph, EdgeMetadata, TransitGraph, TransitRoute};

/// Error returned for an unusable lookup query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address query: {reason}")]
pub struct InvalidQuery {
    reason: &'static str,
}

/// Error returned when an operation references an address key that is not
/// in the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("address not found: {0:?}")]
pub struct AddressNotFound(pub String);

/// Geocoded addresses plus the connectivity and transit graphs over them.
#[derive(Debug, Clone, Default)]
pub struct AddressStore {
    records: BTreeMap<String, AddressRecord>,
    connectivity: ConnectivityGraph,
    transit: TransitGraph,
}

impl AddressStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `query`, geocoding and storing it first if
    /// unknown.
    ///
    /// Idempotent: a second call with the same text returns the stored
    /// record without consulting the geocoder. A geocoder miss is a valid
    /// negative outcome and returns `Ok(None)`; only an empty query is an
    /// error.
    pub fn lookup_or_insert<G: Geocoder>(
        &mut self,
        query: &str,
        geocoder: &mut G,
    ) -> Result<Option<&AddressRecord>, InvalidQuery> {
        if query.is_empty() {
            return Err(InvalidQuery {
                reason: "query must not be empty",
            });
        }

        if self.records.contains_key(query) {
            debug!(query, "address already stored");
            return Ok(self.records.get(query));
        }

        let Some(record) = geocoder.lookup(query) else {
            debug!(query, "geocoder found no match");
            return Ok(None);
        };

        self.insert_record(query, record);
        Ok(self.records.get(query))
    }

    /// Stores a record under `key`, replacing any previous one, and
    /// registers the key as a connectivity node with no edges.
    pub fn insert_record(&mut self, key: impl Into<String>, record: AddressRecord) {
        let key = key.into();
        self.connectivity.ensure_node(&key);
        self.records.insert(key, record);
    }

    /// The record stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&AddressRecord> {
        self.records.get(key)
    }

    /// True when `key` has a stored record.
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Coordinates of the record stored under `key`.
    pub fn coords_of(&self, key: &str) -> Option<Coordinates> {
        self.records.get(key).map(|r| r.coords)
    }

    /// Keys directly connected to `key` in the connectivity graph; empty
    /// for unknown keys.
    pub fn neighbors(&self, key: &str) -> Vec<&str> {
        self.connectivity.neighbors(key)
    }

    /// Connects two stored addresses with an undirected edge.
    ///
    /// Best effort: when either key is unknown the call is a silent
    /// no-op, so callers may attempt speculative connections. A missing
    /// distance is filled with the computed great-circle distance; the
    /// edge replaces any previous one for the same pair.
    pub fn connect(&mut self, k1: &str, k2: &str, mut metadata: EdgeMetadata) {
        let (Some(c1), Some(c2)) = (self.coords_of(k1), self.coords_of(k2)) else {
            debug!(k1, k2, "connect skipped, endpoint not stored");
            return;
        };

        if metadata.distance_km.is_none() {
            match haversine_km(&c1, &c2) {
                Ok(d) => metadata.distance_km = Some(d),
                Err(error) => {
                    warn!(k1, k2, %error, "connect skipped, distance not computable");
                    return;
                }
            }
        }

        self.connectivity.insert_edge(k1, k2, metadata);
    }

    /// Declares a transit line over stored addresses.
    ///
    /// Each consecutive stop pair becomes one directed edge tagged with
    /// `mode` and `line`. Missing per-leg durations default to the
    /// 5-minute placeholder. Unlike [`connect`](Self::connect), an
    /// unknown stop is rejected: transit routes are authored data, not
    /// speculative connections.
    pub fn add_transit_route(
        &mut self,
        stops: Vec<String>,
        mode: impl Into<String>,
        line: impl Into<String>,
        durations: &[f64],
    ) -> Result<(), AddressNotFound> {
        for stop in &stops {
            if !self.contains(stop) {
                return Err(AddressNotFound(stop.clone()));
            }
        }

        let route = TransitRoute::new(stops, mode, line, durations);
        let leg_distances = self.leg_distances(&route.stops);
        self.transit.add_route(route, &leg_distances);
        Ok(())
    }

    /// Lenient route insertion for the file load path: unknown stops and
    /// uncomputable distances degrade to 0 km instead of failing, because
    /// loading deliberately skips cross-reference validation.
    pub(crate) fn add_transit_route_unchecked(&mut self, route: TransitRoute) {
        let leg_distances = self.leg_distances(&route.stops);
        self.transit.add_route(route, &leg_distances);
    }

    fn leg_distances(&self, stops: &[String]) -> Vec<f64> {
        stops
            .windows(2)
            .map(|pair| {
                match (self.coords_of(&pair[0]), self.coords_of(&pair[1])) {
                    (Some(a), Some(b)) => haversine_km(&a, &b).unwrap_or_else(|error| {
                        warn!(from = %pair[0], to = %pair[1], %error, "leg distance defaulted to 0");
                        0.0
                    }),
                    _ => 0.0,
                }
            })
            .collect()
    }

    /// All stored records, keyed by lookup text.
    pub fn records(&self) -> &BTreeMap<String, AddressRecord> {
        &self.records
    }

    /// The connectivity graph.
    pub fn connectivity(&self) -> &ConnectivityGraph {
        &self.connectivity
    }

    /// Crate-internal mutable access for the file load path.
    pub(crate) fn connectivity_mut(&mut self) -> &mut ConnectivityGraph {
        &mut self.connectivity
    }

    /// The transit graph.
    pub fn transit(&self) -> &TransitGraph {
        &self.transit
    }

    /// Number of stored addresses.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no addresses are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
