//! Single-pair shortest path search.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::distance::haversine_km;
use crate::domain::{Criterion, Route};
use crate::graph::{EdgeMetadata, TransitEdge};

use super::{Planner, RouteError, legs};

/// Heap entry for the Dijkstra frontier. Ordered as a min-heap on cost,
/// with the key as a stable tie-break so runs are reproducible.
#[derive(Debug, Clone, Copy)]
struct SearchState<'s> {
    cost: f64,
    key: &'s str,
}

impl PartialEq for SearchState<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchState<'_> {}

impl Ord for SearchState<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we need the cheapest first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.key.cmp(self.key))
    }
}

impl PartialOrd for SearchState<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn connectivity_weight(metadata: &EdgeMetadata, criterion: Criterion) -> f64 {
    match criterion {
        // Duration is not modeled on private-transport edges, so time
        // optimization uses distance as a proxy.
        Criterion::Distance | Criterion::Time => metadata.distance(),
        Criterion::Transfers => 1.0,
    }
}

fn transit_weight(edge: &TransitEdge, criterion: Criterion) -> f64 {
    match criterion {
        Criterion::Distance => edge.distance_km,
        Criterion::Time => edge.duration_mins,
        Criterion::Transfers => 1.0,
    }
}

impl Planner<'_> {
    /// Finds the cheapest path between two stored addresses under the
    /// given criterion.
    ///
    /// When the graph holds no path between the endpoints the result is a
    /// synthesized two-stop route costed at the plain great-circle
    /// distance, so a disconnected graph degrades to a geometrically
    /// naive answer instead of a failure. Equal-cost alternatives resolve
    /// to whichever path the search settles first; that order is stable
    /// for a given graph but is not a contractual tie-break.
    pub fn shortest_path(
        &self,
        origin: &str,
        destination: &str,
        criterion: Criterion,
    ) -> Result<Route, RouteError> {
        self.require(origin)?;
        self.require(destination)?;

        let (stops, cost) = match self.dijkstra(origin, destination, criterion) {
            Some(found) => found,
            None => {
                debug!(origin, destination, "no path in graph, using direct fallback");
                let direct = haversine_km(
                    &legs::point(self.store, origin)?,
                    &legs::point(self.store, destination)?,
                )?;
                (vec![origin.to_string(), destination.to_string()], direct)
            }
        };

        self.assemble(stops, cost)
    }

    /// Direct edge weight between two keys under the criterion, if the
    /// graph for the current transport mode has such an edge. For transit
    /// the cheapest of any parallel edges wins.
    pub(super) fn direct_edge_weight(&self, from: &str, to: &str, criterion: Criterion) -> Option<f64> {
        if self.transport.is_private() {
            self.store
                .connectivity()
                .edge(from, to)
                .map(|metadata| connectivity_weight(metadata, criterion))
        } else {
            self.store
                .transit()
                .edges_from(from)
                .iter()
                .filter(|edge| edge.to == to)
                .map(|edge| transit_weight(edge, criterion))
                .min_by(f64::total_cmp)
        }
    }

    fn successors<'s>(&'s self, key: &str, criterion: Criterion) -> Vec<(&'s str, f64)> {
        if self.transport.is_private() {
            self.store
                .connectivity()
                .edges_from(key)
                .map(|(to, metadata)| (to, connectivity_weight(metadata, criterion)))
                .collect()
        } else {
            self.store
                .transit()
                .edges_from(key)
                .iter()
                .map(|edge| (edge.to.as_str(), transit_weight(edge, criterion)))
                .collect()
        }
    }

    fn dijkstra<'s>(
        &'s self,
        origin: &'s str,
        destination: &'s str,
        criterion: Criterion,
    ) -> Option<(Vec<String>, f64)> {
        let mut dist: HashMap<&'s str, f64> = HashMap::new();
        let mut prev: HashMap<&'s str, &'s str> = HashMap::new();
        let mut heap = BinaryHeap::new();

        dist.insert(origin, 0.0);
        heap.push(SearchState {
            cost: 0.0,
            key: origin,
        });

        while let Some(SearchState { cost, key }) = heap.pop() {
            if key == destination {
                return Some((reconstruct(&prev, origin, destination), cost));
            }

            // Stale entry: a cheaper way to this node was already settled.
            if dist.get(key).is_some_and(|&best| cost > best) {
                continue;
            }

            for (next, weight) in self.successors(key, criterion) {
                let candidate = cost + weight;
                if dist.get(next).is_none_or(|&best| candidate < best) {
                    dist.insert(next, candidate);
                    prev.insert(next, key);
                    heap.push(SearchState {
                        cost: candidate,
                        key: next,
                    });
                }
            }
        }

        None
    }
}

fn reconstruct(prev: &HashMap<&str, &str>, origin: &str, destination: &str) -> Vec<String> {
    let mut stops = vec![destination.to_string()];
    let mut key = destination;
    while key != origin {
        match prev.get(key) {
            Some(&parent) => {
                stops.push(parent.to_string());
                key = parent;
            }
            // Unreachable for a settled destination; bail out rather
            // than loop.
            None => break,
        }
    }
    stops.reverse();
    stops
}
