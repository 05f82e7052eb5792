//! Route result types.
//!
//! A [`Route`] is a computed value: it is rebuilt from the graphs on every
//! query and never persisted. The planner returns routes enriched with
//! per-leg instructions and point geometry pulled from the address store.

use super::{Coordinates, Criterion, TransportMode};

/// A single navigation step between two consecutive stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Human-readable step text.
    pub text: String,
    /// Leg length in kilometers.
    pub distance_km: f64,
    /// Estimated leg duration in seconds.
    pub duration_secs: f64,
    /// Transport mode this leg assumes.
    pub mode: TransportMode,
}

/// An ordered visiting path over stored addresses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    /// Visited address keys, origin first.
    pub stops: Vec<String>,
    /// Total cost under the criterion the search minimized.
    pub cost: f64,
    /// One coordinate per visited stop, concatenated across legs.
    pub geometry: Vec<Coordinates>,
    /// One instruction per leg.
    pub instructions: Vec<Instruction>,
}

impl Route {
    /// Number of legs (one less than the number of stops; zero for the
    /// trivial single-stop route).
    pub fn leg_count(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }
}

/// Aggregate metrics derived from a [`Route`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    /// Sum of great-circle distances over consecutive stops, km.
    pub total_distance_km: f64,
    /// Estimated total travel time in minutes.
    pub total_time_mins: f64,
    /// Number of line/mode changes; always 0 for private transport.
    pub transfers: usize,
    /// Criterion the route was optimized for.
    pub criterion: Criterion,
    /// Transport mode the route assumes.
    pub transport: TransportMode,
}

/// Result of the exhaustive multi-destination search.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRouteResult {
    /// The cheapest concatenated route found.
    pub route: Route,
    /// How many destination orderings were evaluated (n! for n
    /// destinations).
    pub orderings_evaluated: usize,
}

/// Result of the nearest-neighbour greedy ordering.
///
/// The greedy walk stops as soon as no unvisited destination is directly
/// connected to the last visited stop, so the route may be partial.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyRouteResult {
    /// The (possibly partial) open path; it does not return to the origin.
    pub route: Route,
    /// Destinations that could not be reached by a direct edge, in the
    /// order the caller listed them.
    pub unvisited: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leg_count() {
        let mut route = Route::default();
        assert_eq!(route.leg_count(), 0);

        route.stops = vec!["a".into()];
        assert_eq!(route.leg_count(), 0);

        route.stops = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(route.leg_count(), 2);
    }
}
