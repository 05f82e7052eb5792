//! Directed public-transport multigraph.
//!
//! Transit connections are authored as whole lines (an ordered stop
//! sequence with a mode and a line name); each consecutive stop pair
//! becomes one directed edge. Unlike the connectivity graph, parallel
//! edges between the same ordered pair are allowed as long as they belong
//! to different lines. The authored definitions are kept alongside the
//! adjacency so persistence can write stop sequences back out grouped by
//! line.

use std::collections::BTreeMap;

/// Placeholder duration for a leg whose route definition supplied none.
pub const DEFAULT_LEG_DURATION_MINS: f64 = 5.0;

/// An authored transit line: ordered stops plus mode/line identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitRoute {
    /// Ordered stop keys; consecutive pairs become directed edges.
    pub stops: Vec<String>,
    /// Transport mode tag (e.g. "bus", "metro").
    pub mode: String,
    /// Line name (e.g. "Línea 2").
    pub line: String,
    /// Per-leg durations in minutes, one per consecutive stop pair.
    pub leg_durations: Vec<f64>,
}

impl TransitRoute {
    /// Builds a route definition, padding missing per-leg durations with
    /// the 5-minute placeholder and ignoring surplus entries.
    pub fn new(
        stops: Vec<String>,
        mode: impl Into<String>,
        line: impl Into<String>,
        durations: &[f64],
    ) -> Self {
        let legs = stops.len().saturating_sub(1);
        let leg_durations = (0..legs)
            .map(|i| durations.get(i).copied().unwrap_or(DEFAULT_LEG_DURATION_MINS))
            .collect();

        Self {
            stops,
            mode: mode.into(),
            line: line.into(),
            leg_durations,
        }
    }
}

/// One directed transit connection between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitEdge {
    /// Destination stop key.
    pub to: String,
    /// Mode of the owning line.
    pub mode: String,
    /// Name of the owning line.
    pub line: String,
    /// Leg duration in minutes.
    pub duration_mins: f64,
    /// Leg length in kilometers.
    pub distance_km: f64,
}

/// Directed multigraph over address keys, partitioned by (mode, line).
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    routes: Vec<TransitRoute>,
    out_edges: BTreeMap<String, Vec<TransitEdge>>,
}

impl TransitGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an authored route, expanding it into directed edges.
    ///
    /// `leg_distances` must hold one kilometer value per consecutive stop
    /// pair; the caller computes them (the store from live records, the
    /// load path leniently).
    pub(crate) fn add_route(&mut self, route: TransitRoute, leg_distances: &[f64]) {
        for (i, pair) in route.stops.windows(2).enumerate() {
            let edge = TransitEdge {
                to: pair[1].clone(),
                mode: route.mode.clone(),
                line: route.line.clone(),
                duration_mins: route
                    .leg_durations
                    .get(i)
                    .copied()
                    .unwrap_or(DEFAULT_LEG_DURATION_MINS),
                distance_km: leg_distances.get(i).copied().unwrap_or(0.0),
            };
            self.out_edges.entry(pair[0].clone()).or_default().push(edge);
        }
        self.routes.push(route);
    }

    /// Directed edges leaving `key`. Empty for unknown keys.
    pub fn edges_from(&self, key: &str) -> &[TransitEdge] {
        self.out_edges.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The authored route definitions, in insertion order.
    pub fn routes(&self) -> &[TransitRoute] {
        &self.routes
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.out_edges.values().map(Vec::len).sum()
    }

    /// Whether continuing through `b` (arriving from `a`, leaving towards
    /// `c`) requires changing line or mode.
    ///
    /// True when no (mode, line) pair serves both hops. Hops with no
    /// transit edge at all (e.g. synthesized fallback legs) never count
    /// as transfers.
    pub fn is_transfer(&self, a: &str, b: &str, c: &str) -> bool {
        let inbound: Vec<(&str, &str)> = self
            .edges_from(a)
            .iter()
            .filter(|e| e.to == b)
            .map(|e| (e.mode.as_str(), e.line.as_str()))
            .collect();
        if inbound.is_empty() {
            return false;
        }

        let outbound: Vec<(&str, &str)> = self
            .edges_from(b)
            .iter()
            .filter(|e| e.to == c)
            .map(|e| (e.mode.as_str(), e.line.as_str()))
            .collect();
        if outbound.is_empty() {
            return false;
        }

        !outbound.iter().any(|pair| inbound.contains(pair))
    }
}
