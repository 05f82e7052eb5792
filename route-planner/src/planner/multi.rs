//! Multi-destination visiting order.

use itertools::Itertools;
use tracing::debug;

use crate::domain::{Criterion, GreedyRouteResult, MultiRouteResult, Route};

use super::{Planner, RouteError, legs};

impl Planner<'_> {
    /// Finds the cheapest order in which to visit every destination,
    /// starting from `origin`.
    ///
    /// Evaluates all n! permutations of the destinations, costing each
    /// as the concatenation of single-pair shortest paths, and keeps the
    /// first-seen minimum (strict less-than comparison). Exponential in
    /// the destination count; intended for a handful of stops — callers
    /// with larger sets should prefer
    /// [`nearest_neighbor_route`](Self::nearest_neighbor_route).
    ///
    /// An empty destination set yields the trivial single-stop route at
    /// zero cost.
    pub fn optimal_route(
        &self,
        origin: &str,
        destinations: &[String],
        criterion: Criterion,
    ) -> Result<MultiRouteResult, RouteError> {
        self.require(origin)?;
        for destination in destinations {
            self.require(destination)?;
        }

        if destinations.is_empty() {
            return Ok(MultiRouteResult {
                route: self.trivial_route(origin)?,
                orderings_evaluated: 0,
            });
        }

        let mut best: Option<Route> = None;
        let mut orderings_evaluated = 0;

        for ordering in destinations.iter().permutations(destinations.len()) {
            orderings_evaluated += 1;

            let mut candidate = self.trivial_route(origin)?;
            let mut previous = origin;

            for destination in ordering {
                let leg = self.shortest_path(previous, destination, criterion)?;
                candidate.cost += leg.cost;
                candidate.stops.extend(leg.stops.into_iter().skip(1));
                candidate.geometry.extend(leg.geometry.into_iter().skip(1));
                candidate.instructions.extend(leg.instructions);
                previous = destination;
            }

            if best.as_ref().is_none_or(|b| candidate.cost < b.cost) {
                best = Some(candidate);
            }
        }

        debug!(
            destinations = destinations.len(),
            orderings_evaluated, "exhaustive ordering search complete"
        );

        Ok(MultiRouteResult {
            // At least one permutation was evaluated above.
            route: best.unwrap_or_default(),
            orderings_evaluated,
        })
    }

    /// Orders destinations by repeatedly hopping to the nearest unvisited
    /// one, measured by direct edge weight from the last visited stop.
    ///
    /// Polynomial-time alternative to [`optimal_route`](Self::optimal_route).
    /// The walk stops as soon as no remaining destination has a direct
    /// edge from the current stop; whatever is left is reported as
    /// unvisited rather than treated as an error. The path is open — it
    /// does not return to the origin.
    pub fn nearest_neighbor_route(
        &self,
        origin: &str,
        destinations: &[String],
        criterion: Criterion,
    ) -> Result<GreedyRouteResult, RouteError> {
        self.require(origin)?;
        for destination in destinations {
            self.require(destination)?;
        }

        let mut remaining: Vec<&String> = destinations.iter().collect();
        let mut route = self.trivial_route(origin)?;
        let mut current = origin;

        while !remaining.is_empty() {
            let mut best: Option<(usize, f64)> = None;
            for (i, candidate) in remaining.iter().enumerate() {
                if let Some(weight) = self.direct_edge_weight(current, candidate.as_str(), criterion) {
                    if best.is_none_or(|(_, w)| weight < w) {
                        best = Some((i, weight));
                    }
                }
            }

            let Some((index, weight)) = best else {
                debug!(
                    current,
                    unvisited = remaining.len(),
                    "greedy walk stuck, returning partial route"
                );
                break;
            };

            let next = remaining.remove(index);
            route.cost += weight;
            route.stops.push(next.clone());
            route.geometry.push(legs::point(self.store, next)?);
            route
                .instructions
                .push(legs::leg_instruction(self.store, current, next, self.transport)?);
            current = next;
        }

        Ok(GreedyRouteResult {
            route,
            unvisited: remaining.into_iter().cloned().collect(),
        })
    }

    /// Single-stop route: just the origin, zero cost.
    fn trivial_route(&self, origin: &str) -> Result<Route, RouteError> {
        Ok(Route {
            stops: vec![origin.to_string()],
            cost: 0.0,
            geometry: vec![legs::point(self.store, origin)?],
            instructions: Vec::new(),
        })
    }
}
