//! Undirected address connectivity graph.
//!
//! A purpose-built simple-edge adjacency map: at most one edge per
//! unordered key pair, stored in both directions for O(1) neighbor
//! lookup. Ordered maps keep iteration (and therefore search tie-breaks)
//! stable between runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata attached to a connectivity edge.
///
/// Fixed named fields plus an open extension map for caller-supplied
/// extras. The serialized names (`distancia`, `duracion`, …) are the wire
/// contract of the persisted file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeMetadata {
    /// Edge length in kilometers. Filled with the computed great-circle
    /// distance at insertion when the caller omits it; may be absent only
    /// on edges read from a hand-edited file.
    #[serde(rename = "distancia", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    /// Traversal duration in minutes, when known.
    #[serde(rename = "duracion", default, skip_serializing_if = "Option::is_none")]
    pub duration_mins: Option<f64>,

    /// Transport mode tag, when the connection is mode-specific.
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Line name tag, when the connection belongs to a named line.
    #[serde(rename = "linea", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,

    /// Any further caller-supplied attributes, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeMetadata {
    /// Metadata with only a distance set.
    pub fn with_distance(distance_km: f64) -> Self {
        Self {
            distance_km: Some(distance_km),
            ..Self::default()
        }
    }

    /// Edge length in kilometers; zero when absent (possible only for
    /// edges loaded from a file, which is not validated).
    pub fn distance(&self) -> f64 {
        self.distance_km.unwrap_or(0.0)
    }
}

/// Undirected graph over address keys with [`EdgeMetadata`] per edge.
///
/// Membership of endpoints in the address store is enforced by
/// [`AddressStore::connect`](crate::store::AddressStore::connect), not
/// here; the raw insertion API stays crate-private so the lenient file
/// load path can bypass that check.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityGraph {
    adjacency: BTreeMap<String, BTreeMap<String, EdgeMetadata>>,
}

impl ConnectivityGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node with no edges. Idempotent.
    pub(crate) fn ensure_node(&mut self, key: &str) {
        if !self.adjacency.contains_key(key) {
            self.adjacency.insert(key.to_string(), BTreeMap::new());
        }
    }

    /// Inserts or replaces the undirected edge between two keys. The edge
    /// is stored in both directions so neighbor lookup stays O(log n).
    pub(crate) fn insert_edge(&mut self, k1: &str, k2: &str, metadata: EdgeMetadata) {
        self.adjacency
            .entry(k1.to_string())
            .or_default()
            .insert(k2.to_string(), metadata.clone());
        self.adjacency
            .entry(k2.to_string())
            .or_default()
            .insert(k1.to_string(), metadata);
    }

    /// True when the key is registered as a node.
    pub fn contains_node(&self, key: &str) -> bool {
        self.adjacency.contains_key(key)
    }

    /// Keys directly connected to `key`, in lexicographic order. Empty
    /// for unknown keys.
    pub fn neighbors(&self, key: &str) -> Vec<&str> {
        self.adjacency
            .get(key)
            .map(|edges| edges.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Neighbors of `key` together with the connecting edge metadata.
    pub fn edges_from(&self, key: &str) -> impl Iterator<Item = (&str, &EdgeMetadata)> {
        self.adjacency
            .get(key)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(k, m)| (k.as_str(), m)))
    }

    /// The edge between two keys, if present.
    pub fn edge(&self, k1: &str, k2: &str) -> Option<&EdgeMetadata> {
        self.adjacency.get(k1)?.get(k2)
    }

    /// Every edge exactly once, as `(smaller key, larger key, metadata)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeMetadata)> {
        self.adjacency.iter().flat_map(|(from, edges)| {
            edges
                .iter()
                .filter(move |(to, _)| from.as_str() <= to.as_str())
                .map(move |(to, m)| (from.as_str(), to.as_str(), m))
        })
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}
